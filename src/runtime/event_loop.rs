use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::app::{App, Focus, FormField, Mode, PromptKind, SidebarEntry, sidebar_entries};
use crate::audio::{AudioOutput, PlaybackController};
use crate::catalog::Catalog;
use crate::config;
use crate::library::{DurationProbe, RecordStore, Sound, SoundId};
use crate::runtime::startup::import_paths;
use crate::ui;

/// Everything the event loop drives: presentation state, catalog and player.
pub struct Session<S, P, O: AudioOutput> {
    pub app: App,
    pub catalog: Catalog<S, P>,
    pub player: PlaybackController<O>,
    library: config::LibrarySettings,
    /// Internal two-key prefix state used for `gg` handling.
    pending_gg: bool,
}

impl<S, P, O> Session<S, P, O>
where
    S: RecordStore,
    P: DurationProbe,
    O: AudioOutput,
{
    pub fn new(
        app: App,
        catalog: Catalog<S, P>,
        player: PlaybackController<O>,
        library: config::LibrarySettings,
    ) -> Self {
        Self {
            app,
            catalog,
            player,
            library,
            pending_gg: false,
        }
    }

    pub fn visible(&self) -> Vec<&Sound> {
        self.catalog.filter(&self.app.query, &self.app.tag_filters)
    }

    pub fn sidebar(&self) -> Vec<(SidebarEntry, usize)> {
        sidebar_entries(
            self.catalog.len(),
            self.catalog.untagged_count(),
            &self.catalog.tag_counts(),
        )
    }

    fn selected_id(&self) -> Option<SoundId> {
        self.app.selected_sound(&self.visible()).map(|s| s.id)
    }

    /// Keep the cursors valid after the catalog or the filters changed.
    fn clamp(&mut self) {
        let visible = self.visible().len();
        let sidebar = self.sidebar().len();
        self.app.clamp(visible, sidebar);
    }

    /// Housekeeping done once per loop iteration.
    pub fn tick(&mut self) {
        if self.player.poll_finished() {
            debug!("playback reached the end");
        }
    }

    pub fn draw(&self, frame: &mut Frame, ui_settings: &config::UiSettings) {
        let visible = self.visible();
        let sidebar = self.sidebar();
        let view = ui::View {
            visible: &visible,
            sidebar: &sidebar,
            playing: self.player.state(),
        };
        ui::draw(frame, &self.app, &view, ui_settings);
    }

    /// Import from disk and report the outcome in the status line.
    pub fn import(&mut self, roots: &[PathBuf]) {
        let msg = import_paths(&mut self.catalog, roots, &self.library);
        self.app.set_status(msg);
        self.clamp();
    }

    /// Handle one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let quit = match self.app.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Search => {
                self.handle_search_key(key);
                false
            }
            Mode::Prompt { .. } => {
                self.handle_prompt_key(key);
                false
            }
            Mode::ConfirmDelete(id) => {
                self.handle_confirm_key(key, id);
                false
            }
            Mode::Edit(_) => {
                self.handle_edit_key(key);
                false
            }
        };
        self.clamp();
        quit
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> bool {
        if key.code != KeyCode::Char('g') {
            self.pending_gg = false;
        }

        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.focused_len();
                self.app.next(len);
            }
            KeyCode::Char('k') | KeyCode::Up => self.app.prev(),
            KeyCode::Char('g') => {
                if self.pending_gg {
                    self.pending_gg = false;
                    self.app.first();
                } else {
                    self.pending_gg = true;
                }
            }
            KeyCode::Char('G') => {
                let len = self.focused_len();
                self.app.last(len);
            }
            KeyCode::Tab | KeyCode::BackTab => self.app.toggle_focus(),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            KeyCode::Char('/') => self.app.enter_search(),
            KeyCode::Char('x') => {
                self.app.clear_filters();
                self.app.set_status("filters cleared");
            }
            KeyCode::Char('e') => {
                let selected = self.app.selected_sound(&self.visible()).cloned();
                if let Some(sound) = selected {
                    self.app.open_editor(&sound);
                }
            }
            KeyCode::Char('t') => {
                if self.selected_id().is_some() {
                    self.app.open_prompt(PromptKind::AddTag);
                }
            }
            KeyCode::Char('T') => {
                if self.selected_id().is_some() {
                    self.app.open_prompt(PromptKind::RemoveTag);
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id() {
                    self.app.confirm_delete(id);
                }
            }
            KeyCode::Char('i') => self.app.open_prompt(PromptKind::Import),
            KeyCode::Char('R') => match self.catalog.reload() {
                Ok(()) => self.app.set_status(format!("reloaded {} sounds", self.catalog.len())),
                Err(e) => self.app.set_status(format!("reload failed: {e}")),
            },
            _ => {}
        }
        false
    }

    fn focused_len(&self) -> usize {
        match self.app.focus {
            Focus::Sounds => self.visible().len(),
            Focus::Tags => self.sidebar().len(),
        }
    }

    /// Enter/space: toggle playback in the list, toggle a filter in the sidebar.
    fn activate(&mut self) {
        match self.app.focus {
            Focus::Sounds => self.toggle_selected(),
            Focus::Tags => {
                let sidebar = self.sidebar();
                if let Some((entry, _)) = sidebar.get(self.app.sidebar_cursor) {
                    self.app.toggle_sidebar_entry(entry);
                }
            }
        }
    }

    fn toggle_selected(&mut self) {
        let visible = self.catalog.filter(&self.app.query, &self.app.tag_filters);
        let Some(sound) = self.app.selected_sound(&visible) else {
            return;
        };
        if let Err(e) = self.player.toggle(sound) {
            warn!(id = %sound.id, error = %e, "playback failed");
            self.app.set_status(format!("cannot play {}: {e}", sound.name));
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.app.cancel_search(),
            KeyCode::Enter => self.app.finish_search(),
            KeyCode::Backspace => self.app.pop_query_char(),
            KeyCode::Char(c) if !c.is_control() => self.app.push_query_char(c),
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.app.take_mode();
            }
            KeyCode::Enter => {
                if let Mode::Prompt { kind, input } = self.app.take_mode() {
                    self.submit_prompt(kind, input.trim());
                }
            }
            KeyCode::Backspace => {
                if let Mode::Prompt { input, .. } = &mut self.app.mode {
                    input.pop();
                }
            }
            KeyCode::Char(c) if !c.is_control() => {
                if let Mode::Prompt { input, .. } = &mut self.app.mode {
                    input.push(c);
                }
            }
            _ => {}
        }
    }

    fn submit_prompt(&mut self, kind: PromptKind, input: &str) {
        if input.is_empty() {
            return;
        }
        match kind {
            PromptKind::Import => self.import(&[PathBuf::from(input)]),
            PromptKind::AddTag | PromptKind::RemoveTag => {
                let Some(id) = self.selected_id() else {
                    return;
                };
                let result = if kind == PromptKind::AddTag {
                    self.catalog.add_tag(&id, input)
                } else {
                    self.catalog.remove_tag(&id, input)
                };
                let msg = match (kind, result) {
                    (PromptKind::AddTag, Ok(true)) => format!("tagged '{input}'"),
                    (PromptKind::AddTag, Ok(false)) => format!("already tagged '{input}'"),
                    (_, Ok(true)) => format!("removed tag '{input}'"),
                    (_, Ok(false)) => format!("no tag '{input}'"),
                    (_, Err(e)) => format!("tag update failed: {e}"),
                };
                self.app.set_status(msg);
            }
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent, id: SoundId) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.app.take_mode();
                match self.catalog.delete_record(&id) {
                    Ok(()) => {
                        self.player.stop_if_playing(&id);
                        self.app.set_status("deleted");
                    }
                    Err(e) if e.is_stale() => {
                        self.player.stop_if_playing(&id);
                        warn!(%id, error = %e, "deleted, view not refreshed");
                        self.app.set_status(format!("deleted; {e}"));
                    }
                    Err(e) => self.app.set_status(format!("delete failed: {e}")),
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.app.take_mode();
            }
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let Mode::Edit(form) = &mut self.app.mode else {
            return;
        };

        match key.code {
            KeyCode::Esc => {
                self.app.take_mode();
            }
            KeyCode::Char('s') if ctrl => self.save_form(),
            KeyCode::Enter if form.has_pending_tag() => {
                form.commit_tag();
            }
            KeyCode::Enter => self.save_form(),
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.prev_field(),
            KeyCode::Up if form.field == FormField::Category => form.cycle_category(false),
            KeyCode::Down if form.field == FormField::Category => form.cycle_category(true),
            KeyCode::Up => form.prev_field(),
            KeyCode::Down => form.next_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) if !c.is_control() && !ctrl => form.push_char(c),
            _ => {}
        }
    }

    fn save_form(&mut self) {
        let Mode::Edit(form) = self.app.take_mode() else {
            return;
        };
        let name = form.name.clone();
        match self.catalog.update_record(form.into_sound()) {
            Ok(()) => self.app.set_status(format!("saved {name}")),
            Err(e) => self.app.set_status(format!("save failed: {e}")),
        }
    }

    /// Release audio before the process exits.
    pub fn shutdown(&mut self) {
        self.player.shutdown();
    }
}

/// Main terminal event loop: draws, polls playback and handles input.
/// Returns `Ok(())` when the user quits.
pub fn run<S, P, O>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    session: &mut Session<S, P, O>,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: RecordStore,
    P: DurationProbe,
    O: AudioOutput,
{
    loop {
        session.tick();
        terminal.draw(|f| session.draw(f, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if session.handle_key(key) {
                    break;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
