//! Application model types: `App`, its input modes and the sidebar entries.
//!
//! `App` only holds presentation state (selection, filters, prompts). The
//! library itself lives in the catalog and is passed in where needed.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::UNTAGGED;
use crate::library::{Sound, SoundId};

use super::form::EditForm;

/// Which pane receives navigation keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Sounds,
    Tags,
}

/// What a one-line prompt will do with its input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PromptKind {
    AddTag,
    RemoveTag,
    Import,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::AddTag => " add tag ",
            PromptKind::RemoveTag => " remove tag ",
            PromptKind::Import => " import file or directory ",
        }
    }
}

/// The current input mode.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Mode {
    #[default]
    Browse,
    Search,
    Prompt { kind: PromptKind, input: String },
    ConfirmDelete(SoundId),
    Edit(EditForm),
}

/// One row of the tag sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SidebarEntry {
    All,
    Untagged,
    Tag(String),
}

impl SidebarEntry {
    pub fn label(&self) -> &str {
        match self {
            SidebarEntry::All => "All Sounds",
            SidebarEntry::Untagged => UNTAGGED,
            SidebarEntry::Tag(t) => t,
        }
    }
}

/// Sidebar rows with their counts: all sounds, untagged, then every tag.
pub fn sidebar_entries(
    total: usize,
    untagged: usize,
    tag_counts: &BTreeMap<String, usize>,
) -> Vec<(SidebarEntry, usize)> {
    let mut entries = vec![(SidebarEntry::All, total), (SidebarEntry::Untagged, untagged)];
    entries.extend(
        tag_counts
            .iter()
            .filter(|(tag, _)| tag.as_str() != UNTAGGED)
            .map(|(tag, count)| (SidebarEntry::Tag(tag.clone()), *count)),
    );
    entries
}

/// The main application model.
pub struct App {
    /// Index into the currently visible (filtered) list.
    pub selected: usize,
    pub sidebar_cursor: usize,
    pub focus: Focus,
    pub mode: Mode,
    pub query: String,
    pub tag_filters: BTreeSet<String>,
    pub status: Option<String>,
    pub show_notes: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            selected: 0,
            sidebar_cursor: 0,
            focus: Focus::Sounds,
            mode: Mode::Browse,
            query: String::new(),
            tag_filters: BTreeSet::new(),
            status: None,
            show_notes: true,
        }
    }

    /// The selected sound among `visible`, if any.
    pub fn selected_sound<'a>(&self, visible: &[&'a Sound]) -> Option<&'a Sound> {
        visible.get(self.selected).copied()
    }

    /// Keep the cursors inside their lists after the data changed.
    pub fn clamp(&mut self, visible_len: usize, sidebar_len: usize) {
        self.selected = self.selected.min(visible_len.saturating_sub(1));
        self.sidebar_cursor = self.sidebar_cursor.min(sidebar_len.saturating_sub(1));
    }

    fn cursor_mut(&mut self) -> &mut usize {
        match self.focus {
            Focus::Sounds => &mut self.selected,
            Focus::Tags => &mut self.sidebar_cursor,
        }
    }

    /// Move the focused cursor down within a list of `len` rows.
    pub fn next(&mut self, len: usize) {
        let cursor = self.cursor_mut();
        if *cursor + 1 < len {
            *cursor += 1;
        }
    }

    pub fn prev(&mut self) {
        let cursor = self.cursor_mut();
        *cursor = cursor.saturating_sub(1);
    }

    pub fn first(&mut self) {
        *self.cursor_mut() = 0;
    }

    pub fn last(&mut self, len: usize) {
        *self.cursor_mut() = len.saturating_sub(1);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Sounds => Focus::Tags,
            Focus::Tags => Focus::Sounds,
        };
    }

    /// Select or deselect a sidebar entry as a tag filter. "All" clears them.
    pub fn toggle_sidebar_entry(&mut self, entry: &SidebarEntry) {
        match entry {
            SidebarEntry::All => self.tag_filters.clear(),
            SidebarEntry::Untagged => toggle(&mut self.tag_filters, UNTAGGED),
            SidebarEntry::Tag(tag) => toggle(&mut self.tag_filters, tag),
        }
        self.selected = 0;
    }

    pub fn is_entry_active(&self, entry: &SidebarEntry) -> bool {
        match entry {
            SidebarEntry::All => self.tag_filters.is_empty(),
            SidebarEntry::Untagged => self.tag_filters.contains(UNTAGGED),
            SidebarEntry::Tag(tag) => self.tag_filters.contains(tag),
        }
    }

    pub fn enter_search(&mut self) {
        self.mode = Mode::Search;
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.selected = 0;
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
        self.selected = 0;
    }

    /// Leave search mode, keeping the query applied.
    pub fn finish_search(&mut self) {
        self.mode = Mode::Browse;
    }

    /// Leave search mode and drop the query.
    pub fn cancel_search(&mut self) {
        self.query.clear();
        self.mode = Mode::Browse;
        self.selected = 0;
    }

    pub fn clear_filters(&mut self) {
        self.query.clear();
        self.tag_filters.clear();
        self.selected = 0;
    }

    pub fn open_prompt(&mut self, kind: PromptKind) {
        self.mode = Mode::Prompt {
            kind,
            input: String::new(),
        };
    }

    pub fn open_editor(&mut self, sound: &Sound) {
        self.mode = Mode::Edit(EditForm::new(sound));
    }

    pub fn confirm_delete(&mut self, id: SoundId) {
        self.mode = Mode::ConfirmDelete(id);
    }

    /// Return to browsing, handing back whatever mode was active.
    pub fn take_mode(&mut self) -> Mode {
        std::mem::take(&mut self.mode)
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    /// Short description of the active filters, or `None` when nothing is filtered.
    pub fn filter_summary(&self) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        let q = self.query.trim();
        if !q.is_empty() {
            parts.push(format!("search: {q}"));
        }
        if !self.tag_filters.is_empty() {
            let tags: Vec<&str> = self.tag_filters.iter().map(String::as_str).collect();
            parts.push(format!("tags: {}", tags.join(" + ")));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

fn toggle(set: &mut BTreeSet<String>, tag: &str) {
    if !set.remove(tag) {
        set.insert(tag.to_string());
    }
}
