//! Rendering of the picker with ratatui.
//!
//! The screen is split top to bottom into the search line, the selected
//! count, the tree, the status message and a key-hint footer.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::picker::{MessageKind, Picker, Row};

const SELECTED: &str = "☑";
const UNSELECTED: &str = "☐";
const EXPANDED: &str = "▾";
const COLLAPSED: &str = "▸";

const FOOTER: &[(&str, &str)] = &[
    ("↑/↓", "move"),
    ("←/→", "open/close"),
    ("Space", "select"),
    ("Enter", "copy"),
    ("Esc", "quit"),
];

/// Draw the whole picker.
pub fn render(frame: &mut Frame, picker: &Picker) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Search
            Constraint::Length(1), // Selected count
            Constraint::Min(3),    // Tree
            Constraint::Length(1), // Status
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_search(frame, picker, chunks[0]);
    render_count(frame, picker, chunks[1]);
    render_tree(frame, picker, chunks[2]);
    render_status(frame, picker, chunks[3]);
    render_footer(frame, chunks[4]);
}

fn render_search(frame: &mut Frame, picker: &Picker, area: Rect) {
    let line = Line::from(vec![
        Span::styled("Search: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(picker.query().to_string()),
        Span::styled("▏", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_count(frame: &mut Frame, picker: &Picker, area: Rect) {
    let text = format!("Selected: {}", picker.selection().len());
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Cyan)),
        area,
    );
}

fn render_tree(frame: &mut Frame, picker: &Picker, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .title(format!(" {} ", picker.tree().root().display()));

    let rows = picker.rows();
    if rows.is_empty() {
        let placeholder = Paragraph::new("No items found")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = rows.iter().map(row_item).collect();
    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    // The list scrolls itself to keep the highlighted row in view
    let mut state = ListState::default().with_selected(picker.current_row());
    frame.render_stateful_widget(list, area, &mut state);
}

/// Text of one tree line
pub fn row_text(row: &Row) -> String {
    let indent = "  ".repeat(row.depth);
    let check = if row.selected { SELECTED } else { UNSELECTED };
    if row.is_dir {
        let arrow = if row.expanded { EXPANDED } else { COLLAPSED };
        format!("{}{} {} {}/", indent, check, arrow, row.name)
    } else {
        format!("{}{}   {}", indent, check, row.name)
    }
}

fn row_item(row: &Row) -> ListItem<'static> {
    let style = if row.selected {
        Style::default().fg(Color::Green)
    } else if row.is_dir {
        Style::default().fg(Color::Blue)
    } else {
        Style::default()
    };
    ListItem::new(row_text(row)).style(style)
}

fn render_status(frame: &mut Frame, picker: &Picker, area: Rect) {
    let Some(message) = picker.message() else {
        return;
    };
    let style = match message.kind {
        MessageKind::Info => Style::default(),
        MessageKind::Success => Style::default().fg(Color::Green),
        MessageKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };
    frame.render_widget(Paragraph::new(message.text.clone()).style(style), area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let mut spans = Vec::with_capacity(FOOTER.len() * 3);
    for (i, (key, desc)) in FOOTER.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            *key,
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}", desc),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::Action;
    use crate::tree::{fixtures::sample, Tree};
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(picker: &Picker, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, picker)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect()
    }

    fn screen(picker: &Picker) -> String {
        draw(picker, 60, 14).join("\n")
    }

    #[test]
    fn test_row_text() {
        let dir = Row {
            name: "src".to_string(),
            depth: 1,
            is_dir: true,
            expanded: false,
            selected: true,
            current: false,
        };
        assert_eq!(row_text(&dir), "  ☑ ▸ src/");

        let file = Row {
            name: "lib.rs".to_string(),
            depth: 0,
            is_dir: false,
            expanded: false,
            selected: false,
            current: true,
        };
        assert_eq!(row_text(&file), "☐   lib.rs");
    }

    #[test]
    fn test_renders_tree_and_headers() {
        let mut picker = Picker::new(Tree::new("/p", sample()));
        picker.handle(Action::Next);
        picker.handle(Action::Next);
        picker.handle(Action::ToggleSelection);

        let text = screen(&picker);
        assert!(text.contains("Search:"));
        assert!(text.contains("Selected: 1"));
        assert!(text.contains("docs/"));
        assert!(text.contains("src/"));
        assert!(text.contains("README.md"));
        assert!(!text.contains("lib.rs"), "collapsed folders hide children");
        assert!(text.contains("Enter copy"));
    }

    #[test]
    fn test_renders_query_and_placeholder() {
        let mut picker = Picker::new(Tree::new("/p", sample()));
        for c in "zzz".chars() {
            picker.handle(Action::InsertChar(c));
        }
        let text = screen(&picker);
        assert!(text.contains("Search: zzz"));
        assert!(text.contains("No items found"));
    }

    #[test]
    fn test_renders_status_message() {
        let mut picker = Picker::new(Tree::new("/p", sample()));
        picker.set_message(MessageKind::Error, "Clipboard write failed");
        assert!(screen(&picker).contains("Clipboard write failed"));
    }

    #[test]
    fn test_cursor_row_stays_visible_when_scrolling() {
        let nodes = (0..30)
            .map(|i| crate::types::Node::file(format!("f{:02}.txt", i), format!("/p/f{:02}.txt", i), 0))
            .collect();
        let mut picker = Picker::new(Tree::new("/p", nodes));
        for _ in 0..25 {
            picker.handle(Action::Next);
        }
        let text = screen(&picker);
        assert!(text.contains("f25.txt"));
        assert!(!text.contains("f00.txt"));
    }
}
