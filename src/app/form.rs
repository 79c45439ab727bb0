//! The edit form shown over the list when a sound's details are edited.

use crate::library::{KNOWN_CATEGORIES, Sound, SoundId};

/// Which input of the form has focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Category,
    Notes,
    Tags,
}

impl FormField {
    const ORDER: [FormField; 4] = [
        FormField::Name,
        FormField::Category,
        FormField::Notes,
        FormField::Tags,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Category => "Category",
            FormField::Notes => "Notes",
            FormField::Tags => "Tags",
        }
    }
}

/// Working copy of a sound's editable fields.
///
/// Nothing is written until the form is turned back into a [`Sound`] and
/// handed to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    original: Sound,
    pub name: String,
    pub category: String,
    pub notes: String,
    pub tags: Vec<String>,
    pub tag_input: String,
    pub field: FormField,
}

impl EditForm {
    pub fn new(sound: &Sound) -> Self {
        Self {
            original: sound.clone(),
            name: sound.name.clone(),
            category: sound.category.clone().unwrap_or_default(),
            notes: sound.notes.clone(),
            tags: sound.tags.clone(),
            tag_input: String::new(),
            field: FormField::Name,
        }
    }

    pub fn id(&self) -> SoundId {
        self.original.id
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn prev_field(&mut self) {
        self.field = self.field.prev();
    }

    /// Type into the focused field.
    pub fn push_char(&mut self, c: char) {
        self.focused_text().push(c);
    }

    /// Delete from the focused field. On an empty tag input this removes the
    /// last tag instead.
    pub fn backspace(&mut self) {
        if self.field == FormField::Tags && self.tag_input.is_empty() {
            self.tags.pop();
            return;
        }
        self.focused_text().pop();
    }

    /// Move the category through "none" and the known categories.
    ///
    /// A custom category not in the list starts the cycle from the top.
    pub fn cycle_category(&mut self, forward: bool) {
        let choices = KNOWN_CATEGORIES.len() + 1;
        let current = KNOWN_CATEGORIES
            .iter()
            .position(|c| *c == self.category.trim())
            .map(|i| i + 1)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % choices
        } else {
            (current + choices - 1) % choices
        };
        self.category = match next {
            0 => String::new(),
            i => KNOWN_CATEGORIES[i - 1].to_string(),
        };
    }

    /// Add the pending tag input. Returns false when there was nothing new to add.
    pub fn commit_tag(&mut self) -> bool {
        let tag = self.tag_input.trim().to_string();
        self.tag_input.clear();
        if tag.is_empty() || self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// True when Enter should add a tag rather than save the form.
    pub fn has_pending_tag(&self) -> bool {
        self.field == FormField::Tags && !self.tag_input.trim().is_empty()
    }

    /// Build the record to save. Any pending tag input is included.
    pub fn into_sound(mut self) -> Sound {
        self.commit_tag();
        let category = Some(self.category).filter(|c| !c.trim().is_empty());
        Sound {
            name: self.name,
            category,
            notes: self.notes,
            tags: self.tags,
            ..self.original
        }
    }

    fn focused_text(&mut self) -> &mut String {
        match self.field {
            FormField::Name => &mut self.name,
            FormField::Category => &mut self.category,
            FormField::Notes => &mut self.notes,
            FormField::Tags => &mut self.tag_input,
        }
    }
}
