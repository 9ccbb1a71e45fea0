/*!
 * Picker state machine
 *
 * Owns everything that changes while the user works: the loaded tree, the
 * derived search view, the query, the cursor, the selection and the status
 * line. One action is applied at a time; the renderer reads a fresh
 * [`Row`] snapshot afterwards.
 */

use std::path::Path;

use crate::error::Result;
use crate::filter::filter;
use crate::navigation::Cursor;
use crate::selection::Selection;
use crate::source::FileSource;
use crate::tree::{flatten, Tree};
use crate::types::Node;
use crate::writer::{Document, XmlWriter};

/// User intention, already decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Serialize the selection and finish
    Commit,
    /// Move the cursor down
    Next,
    /// Move the cursor up
    Previous,
    /// Open or close the directory under the cursor
    ToggleExpansion,
    /// Select or deselect the item under the cursor
    ToggleSelection,
    /// Drop the last query character
    DeleteChar,
    /// Append a character to the query
    InsertChar(char),
    /// Leave without copying anything
    Quit,
}

/// What the caller has to do after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Commit,
    Quit,
}

/// Tone of the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

/// Message shown under the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

/// One visible line of the tree, ready to draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub name: String,
    pub depth: usize,
    pub is_dir: bool,
    pub expanded: bool,
    pub selected: bool,
    pub current: bool,
}

#[derive(Debug, Clone)]
pub struct Picker {
    tree: Tree,
    /// Search view; `None` while the query is empty
    filtered: Option<Vec<Node>>,
    query: String,
    cursor: Cursor,
    selection: Selection,
    message: Option<StatusMessage>,
}

impl Picker {
    /// Start on the first top-level item with nothing selected
    pub fn new(tree: Tree) -> Self {
        let mut cursor = Cursor::default();
        cursor.reset_for_query(tree.nodes(), "");
        Self {
            tree,
            filtered: None,
            query: String::new(),
            cursor,
            selection: Selection::new(),
            message: None,
        }
    }

    /// Apply one action
    pub fn handle(&mut self, action: Action) -> Step {
        match action {
            Action::Commit => return Step::Commit,
            Action::Quit => return Step::Quit,
            Action::Next => self.next(),
            Action::Previous => self.previous(),
            Action::ToggleExpansion => {
                self.toggle_expansion();
            }
            Action::ToggleSelection => {
                self.toggle_selection();
            }
            Action::DeleteChar => self.pop_char(),
            Action::InsertChar(c) => self.push_char(c),
        }
        Step::Continue
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn current(&self) -> Option<&Path> {
        self.cursor.current()
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    pub fn set_message(&mut self, kind: MessageKind, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            kind,
            text: text.into(),
        });
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// The nodes currently on screen: the search view while searching,
    /// the loaded tree otherwise
    pub fn view(&self) -> &[Node] {
        match &self.filtered {
            Some(nodes) => nodes,
            None => self.tree.nodes(),
        }
    }

    fn view_mut(&mut self) -> &mut [Node] {
        match &mut self.filtered {
            Some(nodes) => nodes,
            None => self.tree.nodes_mut(),
        }
    }

    /// Replace the query and re-derive the view
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.query {
            return;
        }
        self.query = query;
        self.filtered = if self.query.is_empty() {
            None
        } else {
            Some(filter(self.tree.nodes(), &self.query))
        };

        let Self {
            cursor,
            filtered,
            tree,
            query,
            ..
        } = self;
        let view = filtered.as_deref().unwrap_or(tree.nodes());
        cursor.reset_for_query(view, query.as_str());
        log::trace!("Query {:?} shows {} rows", query, flatten(view).len());
    }

    pub fn push_char(&mut self, c: char) {
        let mut query = self.query.clone();
        query.push(c);
        self.set_query(query);
    }

    pub fn pop_char(&mut self) {
        let mut query = self.query.clone();
        if query.pop().is_some() {
            self.set_query(query);
        }
    }

    pub fn next(&mut self) {
        let Self {
            cursor,
            filtered,
            tree,
            ..
        } = self;
        cursor.next(filtered.as_deref().unwrap_or(tree.nodes()));
    }

    pub fn previous(&mut self) {
        let Self {
            cursor,
            filtered,
            tree,
            ..
        } = self;
        cursor.previous(filtered.as_deref().unwrap_or(tree.nodes()));
    }

    /// Open or close the directory under the cursor in the current view
    pub fn toggle_expansion(&mut self) -> bool {
        let cursor = self.cursor.clone();
        cursor.toggle_expansion(self.view_mut())
    }

    /// Toggle the item under the cursor. The node is looked up in the full
    /// tree, so a folder found through search selects all of its contents.
    pub fn toggle_selection(&mut self) -> bool {
        let Some(current) = self.cursor.current() else {
            return false;
        };
        match self.tree.find(current) {
            Some(node) => {
                self.selection.toggle(node);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the visible rows
    pub fn rows(&self) -> Vec<Row> {
        let current = self.cursor.current();
        flatten(self.view())
            .into_iter()
            .map(|node| Row {
                name: node.name.clone(),
                depth: node.depth,
                is_dir: node.is_dir(),
                expanded: node.expanded,
                selected: self.selection.contains(&node.path),
                current: current == Some(node.path.as_path()),
            })
            .collect()
    }

    /// Index of the cursor row in [`Picker::rows`]
    pub fn current_row(&self) -> Option<usize> {
        let current = self.cursor.current()?;
        flatten(self.view())
            .iter()
            .position(|node| node.path.as_path() == current)
    }

    /// Selected nodes in path order
    pub fn selected_nodes(&self) -> Vec<&Node> {
        self.selection.resolve(&self.tree)
    }

    /// Serialize the current selection
    pub fn serialize(&self, writer: &XmlWriter, source: &dyn FileSource) -> Result<Document> {
        writer.serialize(&self.selected_nodes(), source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::fixtures::sample;
    use proptest::prelude::*;

    fn picker() -> Picker {
        Picker::new(Tree::new("/p", sample()))
    }

    fn visible(picker: &Picker) -> Vec<String> {
        picker.rows().into_iter().map(|r| r.name).collect()
    }

    fn current(picker: &Picker) -> Option<&str> {
        picker.current().and_then(|p| p.to_str())
    }

    fn type_str(picker: &mut Picker, text: &str) {
        for c in text.chars() {
            picker.handle(Action::InsertChar(c));
        }
    }

    #[test]
    fn test_starts_on_first_item() {
        let picker = picker();
        assert_eq!(current(&picker), Some("/p/docs"));
        assert_eq!(visible(&picker), vec!["docs", "src", "README.md"]);
        assert_eq!(picker.current_row(), Some(0));
    }

    #[test]
    fn test_empty_tree() {
        let mut picker = Picker::new(Tree::new("/p", Vec::new()));
        assert_eq!(picker.current(), None);
        picker.handle(Action::Next);
        picker.handle(Action::Previous);
        assert!(!picker.toggle_selection());
        assert!(picker.rows().is_empty());
    }

    #[test]
    fn test_commit_and_quit_steps() {
        let mut picker = picker();
        assert_eq!(picker.handle(Action::Commit), Step::Commit);
        assert_eq!(picker.handle(Action::Quit), Step::Quit);
        assert_eq!(picker.handle(Action::Next), Step::Continue);
    }

    #[test]
    fn test_typing_filters_and_moves_cursor_to_first_file() {
        let mut picker = picker();
        type_str(&mut picker, "rs");
        assert_eq!(picker.query(), "rs");
        assert_eq!(visible(&picker), vec!["src", "util", "mod.rs", "lib.rs"]);
        assert_eq!(current(&picker), Some("/p/src/util/mod.rs"));
    }

    #[test]
    fn test_clearing_query_restores_tree_and_cursor() {
        let mut picker = picker();
        picker.handle(Action::ToggleExpansion); // open docs
        type_str(&mut picker, "lib");
        assert_eq!(visible(&picker), vec!["src", "lib.rs"]);

        picker.handle(Action::DeleteChar);
        picker.handle(Action::DeleteChar);
        picker.handle(Action::DeleteChar);
        assert_eq!(picker.query(), "");
        assert_eq!(visible(&picker), vec!["docs", "guide.md", "src", "README.md"]);
        assert_eq!(current(&picker), Some("/p/docs"));
    }

    #[test]
    fn test_backspace_on_empty_query_keeps_cursor() {
        let mut picker = picker();
        picker.handle(Action::Next);
        picker.handle(Action::DeleteChar);
        assert_eq!(current(&picker), Some("/p/src"));
    }

    #[test]
    fn test_no_matches_clears_cursor() {
        let mut picker = picker();
        type_str(&mut picker, "qqq");
        assert!(picker.rows().is_empty());
        assert_eq!(picker.current(), None);
        picker.handle(Action::Next);
        assert_eq!(picker.current(), None);
    }

    #[test]
    fn test_expansion_in_search_view_is_temporary() {
        let mut picker = picker();
        type_str(&mut picker, "mod");
        picker.handle(Action::Previous); // mod.rs -> util
        picker.handle(Action::ToggleExpansion);
        assert_eq!(visible(&picker), vec!["src", "util"]);
        // the loaded tree is untouched
        assert!(!picker.tree().nodes()[1].expanded);

        picker.handle(Action::DeleteChar);
        picker.handle(Action::InsertChar('d'));
        assert_eq!(visible(&picker), vec!["src", "util", "mod.rs"]);
    }

    #[test]
    fn test_select_folder_from_search_takes_whole_folder() {
        let mut picker = picker();
        type_str(&mut picker, "lib");
        picker.handle(Action::Previous); // lib.rs -> src
        assert_eq!(current(&picker), Some("/p/src"));
        picker.handle(Action::ToggleSelection);
        assert_eq!(picker.selection().len(), 4);
        assert!(picker
            .selection()
            .contains(Path::new("/p/src/util/mod.rs")));
    }

    #[test]
    fn test_rows_mark_selection_and_cursor() {
        let mut picker = picker();
        picker.handle(Action::Next);
        picker.handle(Action::Next);
        picker.handle(Action::ToggleSelection);
        let rows = picker.rows();
        let readme = rows.iter().find(|r| r.name == "README.md").unwrap();
        assert!(readme.selected && readme.current && !readme.is_dir);
        assert!(rows.iter().filter(|r| r.current).count() == 1);
    }

    #[test]
    fn test_next_wraps_from_last_row() {
        let mut picker = picker();
        for _ in 0..3 {
            picker.handle(Action::Next);
        }
        assert_eq!(current(&picker), Some("/p/docs"));
    }

    #[test]
    fn test_message_roundtrip() {
        let mut picker = picker();
        picker.set_message(MessageKind::Error, "boom");
        assert_eq!(picker.message().map(|m| m.kind), Some(MessageKind::Error));
        picker.clear_message();
        assert!(picker.message().is_none());
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            Just(Action::Next),
            Just(Action::Previous),
            Just(Action::ToggleExpansion),
            Just(Action::ToggleSelection),
            Just(Action::DeleteChar),
            prop::sample::select(vec!['r', 's', '.', 'm', 'd', 'x']).prop_map(Action::InsertChar),
        ]
    }

    proptest! {
        #[test]
        fn cursor_stays_on_a_visible_row(actions in prop::collection::vec(action(), 0..40)) {
            let mut picker = picker();
            for action in actions {
                prop_assert_eq!(picker.handle(action), Step::Continue);
                if let Some(current) = picker.current() {
                    prop_assert!(picker.current_row().is_some(), "{} is hidden", current.display());
                }
            }
        }
    }
}
