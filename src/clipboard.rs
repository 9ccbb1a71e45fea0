/*!
 * Clipboard support for PickFS
 *
 * The committed document is handed to whichever command-line clipboard tool
 * the system offers. Detection happens once per copy; the copy itself is a
 * single attempt.
 */

use std::env;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use thiserror::Error;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Something that accepts the final document
pub trait Clipboard {
    /// Copy text to the clipboard
    fn copy_to_clipboard(&self, text: &str) -> Result<()>;

    /// Short human-readable name, used in messages and the report
    fn name(&self) -> String {
        "clipboard".to_string()
    }
}

/// Available clipboard providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardProvider {
    /// tmux paste buffer
    Tmux,
    /// X11 clipboard with xclip
    Xclip,
    /// X11 clipboard with xsel
    Xsel,
    /// Wayland clipboard
    Wayland,
    /// macOS clipboard
    MacOS,
    /// Windows clipboard (via WSL)
    Wsl,
    /// Termux clipboard
    Termux,
}

impl ClipboardProvider {
    /// Program and arguments that read the text from stdin
    fn command(self) -> (&'static str, Vec<&'static str>) {
        match self {
            Self::Tmux => ("tmux", vec!["load-buffer", "-w", "-"]),
            Self::Xclip => ("xclip", vec!["-selection", "clipboard", "-in"]),
            Self::Xsel => ("xsel", vec!["-b", "-i"]),
            Self::Wayland => ("wl-copy", vec![]),
            Self::MacOS => ("pbcopy", vec![]),
            Self::Wsl => ("clip.exe", vec![]),
            Self::Termux => ("termux-clipboard-set", vec![]),
        }
    }
}

impl Clipboard for ClipboardProvider {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let (cmd, args) = self.command();
        execute_clipboard_command(cmd, &args, text)
    }

    fn name(&self) -> String {
        self.command().0.to_string()
    }
}

/// The system clipboard, resolved to a provider at copy time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let provider = detect_provider()?;
        log::info!("Copying {} bytes with {}", text.len(), provider.name());
        provider.copy_to_clipboard(text)
    }

    fn name(&self) -> String {
        detect_provider()
            .map(|p| format!("clipboard ({})", p.name()))
            .unwrap_or_else(|_| "clipboard".to_string())
    }
}

//--------------------------------------------------------------------
// Public API
//--------------------------------------------------------------------

/// Check if a command exists on the system PATH
pub fn command_exists(command: &str) -> bool {
    if let Ok(paths) = env::var("PATH") {
        for path in env::split_paths(&paths) {
            if path.join(command).is_file() {
                return true;
            }
        }
    }
    false
}

/// Pick the preferred provider for this system
pub fn detect_provider() -> Result<ClipboardProvider> {
    determine_clipboard_providers()
        .into_iter()
        .next()
        .ok_or(ClipboardError::NoClipboardFound)
}

//--------------------------------------------------------------------
// Internal Implementation
//--------------------------------------------------------------------

/// Spawn the command, feed it the text and wait for it.
///
/// Its output is discarded since the terminal belongs to the picker UI.
fn execute_clipboard_command(cmd: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ClipboardError::CommandFailed(format!("Failed to spawn {}: {}", cmd, e)))?;

    {
        let stdin = child.stdin.as_mut().ok_or_else(|| {
            ClipboardError::CommandFailed(format!("Failed to open stdin for {}", cmd))
        })?;
        stdin
            .write_all(text.as_bytes())
            .map_err(|_| ClipboardError::CommandFailed(format!("Failed to write to {}", cmd)))?;
    }
    // Close stdin so the tool sees end of input
    drop(child.stdin.take());

    let status = child
        .wait()
        .map_err(|_| ClipboardError::CommandFailed(format!("Failed to wait for {}", cmd)))?;

    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, status
        )))
    }
}

static PLATFORM: OnceLock<&'static str> = OnceLock::new();

/// Determine the platform (cached)
fn get_platform() -> &'static str {
    PLATFORM.get_or_init(|| {
        if cfg!(target_os = "macos") {
            "macos"
        } else if cfg!(target_os = "windows") {
            "windows"
        } else if cfg!(target_os = "linux") {
            if env::var("WSL_DISTRO_NAME").is_ok() {
                "wsl"
            } else {
                "linux"
            }
        } else if cfg!(target_os = "android") {
            "android"
        } else {
            "unknown"
        }
    })
}

/// Providers to try, most preferred first
fn determine_clipboard_providers() -> Vec<ClipboardProvider> {
    let mut providers = Vec::with_capacity(3);

    // Inside tmux the paste buffer is what the user expects
    if env::var("TMUX").is_ok() && command_exists("tmux") {
        providers.push(ClipboardProvider::Tmux);
    }

    match get_platform() {
        "macos" => {
            if command_exists("pbcopy") {
                providers.push(ClipboardProvider::MacOS);
            }
        }
        "windows" | "wsl" => {
            if command_exists("clip.exe") {
                providers.push(ClipboardProvider::Wsl);
            }
        }
        "linux" => {
            if env::var("WAYLAND_DISPLAY").is_ok() && command_exists("wl-copy") {
                providers.push(ClipboardProvider::Wayland);
            }
            if command_exists("xsel") {
                providers.push(ClipboardProvider::Xsel);
            }
            if command_exists("xclip") {
                providers.push(ClipboardProvider::Xclip);
            }
        }
        "android" => {
            if command_exists("termux-clipboard-set") {
                providers.push(ClipboardProvider::Termux);
            }
        }
        _ => {}
    }

    log::debug!("Clipboard providers available: {:?}", providers);
    providers
}
