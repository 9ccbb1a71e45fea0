/*!
 * XML writer implementation for PickFS
 */

use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::path::PathBuf;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::Result;
use crate::report::FileReportInfo;
use crate::source::FileSource;
use crate::types::{Node, NodeKind};

/// Root element wrapping the whole document
const ROOT_TAG: &str = "files";

/// Text embedded when a file cannot be read
pub const READ_ERROR_MARKER: &str = "Failed to read file content";

/// A serialized selection
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// The XML text
    pub content: String,
    /// Files whose content was embedded; unreadable files are not counted
    pub file_count: usize,
    /// Line and character counts per embedded file, keyed by path
    pub file_details: BTreeMap<String, FileReportInfo>,
}

/// XML writer for a selection of tree nodes
#[derive(Debug, Clone)]
pub struct XmlWriter {
    indent: usize,
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlWriter {
    /// Create a new XML writer
    pub fn new() -> Self {
        Self { indent: 2 }
    }

    /// Serialize the selection into one document.
    ///
    /// Nodes are emitted in path order. A path is written at most once, so a
    /// file that is both selected itself and contained in a selected folder
    /// appears a single time.
    pub fn serialize(&self, selection: &[&Node], source: &dyn FileSource) -> Result<Document> {
        let mut sorted: Vec<&Node> = selection.to_vec();
        sorted.sort_by(|a, b| a.path.to_string_lossy().cmp(&b.path.to_string_lossy()));
        sorted.dedup_by(|a, b| a.path == b.path);

        let mut xml_writer = Writer::new_with_indent(Vec::new(), b' ', self.indent);
        let mut state = WriteState::default();

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xml_writer.write_event(Event::Start(BytesStart::new(ROOT_TAG)))?;

        for node in sorted {
            self.write_node(node, source, &mut xml_writer, &mut state)?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new(ROOT_TAG)))?;

        let content = String::from_utf8(xml_writer.into_inner())
            .map_err(|e| crate::error!(Writer, "generated document is not UTF-8: {}", e))?;

        Ok(Document {
            content,
            file_count: state.file_count,
            file_details: state.file_details,
        })
    }

    fn write_node<W: Write>(
        &self,
        node: &Node,
        source: &dyn FileSource,
        writer: &mut Writer<W>,
        state: &mut WriteState,
    ) -> Result<()> {
        if !state.emitted.insert(node.path.clone()) {
            return Ok(());
        }

        match node.kind {
            NodeKind::Directory => self.write_directory(node, source, writer, state),
            NodeKind::File => self.write_file(node, source, writer, state),
        }
    }

    /// Write a directory node and everything below it
    fn write_directory<W: Write>(
        &self,
        dir: &Node,
        source: &dyn FileSource,
        writer: &mut Writer<W>,
        state: &mut WriteState,
    ) -> Result<()> {
        writer.write_event(Event::Start(tagged("directory", dir)))?;
        for child in &dir.children {
            self.write_node(child, source, writer, state)?;
        }
        writer.write_event(Event::End(BytesEnd::new("directory")))?;
        Ok(())
    }

    /// Write a file node with its content, or an error marker
    fn write_file<W: Write>(
        &self,
        file: &Node,
        source: &dyn FileSource,
        writer: &mut Writer<W>,
        state: &mut WriteState,
    ) -> Result<()> {
        writer.write_event(Event::Start(tagged("file", file)))?;

        match source.read_to_string(&file.path) {
            Ok(content) => {
                writer.write_event(Event::Start(BytesStart::new("content")))?;
                for section in cdata_sections(&content) {
                    writer.write_event(Event::CData(BytesCData::new(section)))?;
                }
                writer.write_event(Event::End(BytesEnd::new("content")))?;

                state.file_count += 1;
                state.file_details.insert(
                    file.path.to_string_lossy().to_string(),
                    FileReportInfo {
                        lines: content.lines().count(),
                        chars: content.chars().count(),
                    },
                );
            }
            Err(e) => {
                log::debug!("Failed to read {}: {}", file.path.display(), e);
                writer.write_event(Event::Start(BytesStart::new("error")))?;
                writer.write_event(Event::Text(BytesText::new(READ_ERROR_MARKER)))?;
                writer.write_event(Event::End(BytesEnd::new("error")))?;
            }
        }

        writer.write_event(Event::End(BytesEnd::new("file")))?;
        Ok(())
    }
}

#[derive(Default)]
struct WriteState {
    emitted: HashSet<PathBuf>,
    file_count: usize,
    file_details: BTreeMap<String, FileReportInfo>,
}

fn tagged<'a>(tag: &'a str, node: &'a Node) -> BytesStart<'a> {
    let mut start_tag = BytesStart::new(tag);
    start_tag.push_attribute(("name", node.name.as_str()));
    start_tag.push_attribute(("path", node.path.to_string_lossy().as_ref()));
    start_tag
}

/// Split text into pieces that can each sit inside one CDATA section.
///
/// `]]>` would close the section early, so every occurrence is cut between
/// `]]` and `>`; the pieces concatenate back to the original text.
pub fn cdata_sections(content: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = content;
    while let Some(index) = rest.find("]]>") {
        let (head, tail) = rest.split_at(index + 2);
        sections.push(head);
        rest = tail;
    }
    sections.push(rest);
    sections
}
