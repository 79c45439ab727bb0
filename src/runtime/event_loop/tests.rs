use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::Session;
use crate::app::{App, Focus, FormField, Mode, PromptKind};
use crate::audio::{AudioOutput, PlaybackController, PlaybackState, Voice};
use crate::catalog::Catalog;
use crate::config::LibrarySettings;
use crate::error::{PlaybackError, ProbeError, StoreError};
use crate::library::{DurationProbe, ImportBlob, RecordStore, Sound, SoundId, SqliteStore};

struct FixedProbe;

impl DurationProbe for FixedProbe {
    fn probe(&self, _audio: Arc<[u8]>) -> Result<f64, ProbeError> {
        Ok(2.0)
    }
}

#[derive(Default)]
struct Counters {
    held: Cell<i32>,
    finished: Cell<bool>,
}

struct CountingOutput(Rc<Counters>);

struct CountingVoice(Rc<Counters>);

impl Voice for CountingVoice {
    fn play(&self) {}
    fn pause(&self) {}
    fn finished(&self) -> bool {
        self.0.finished.get()
    }
    fn release(self) {
        self.0.held.set(self.0.held.get() - 1);
    }
}

impl AudioOutput for CountingOutput {
    type Voice = CountingVoice;

    fn acquire(&mut self, _audio: Arc<[u8]>) -> Result<CountingVoice, PlaybackError> {
        self.0.held.set(self.0.held.get() + 1);
        Ok(CountingVoice(self.0.clone()))
    }
}

/// In-memory store whose `fetch_all` can be switched off from the test.
struct OutageStore {
    inner: SqliteStore,
    down: Rc<Cell<bool>>,
}

impl RecordStore for OutageStore {
    fn insert(&mut self, sound: &Sound) -> Result<SoundId, StoreError> {
        self.inner.insert(sound)
    }

    fn fetch_all(&self) -> Result<Vec<Sound>, StoreError> {
        if self.down.get() {
            return Err(StoreError::Io(std::io::Error::other("outage")));
        }
        self.inner.fetch_all()
    }

    fn fetch_one(&self, id: &SoundId) -> Result<Sound, StoreError> {
        self.inner.fetch_one(id)
    }

    fn update(&mut self, sound: &Sound) -> Result<SoundId, StoreError> {
        self.inner.update(sound)
    }

    fn delete(&mut self, id: &SoundId) -> Result<(), StoreError> {
        self.inner.delete(id)
    }

    fn fetch_by_category(&self, category: &str) -> Result<Vec<Sound>, StoreError> {
        self.inner.fetch_by_category(category)
    }
}

type TestSession = Session<OutageStore, FixedProbe, CountingOutput>;

fn session(files: &[&str]) -> (TestSession, Rc<Counters>) {
    let (s, counters, _) = session_with_outage(files);
    (s, counters)
}

fn session_with_outage(files: &[&str]) -> (TestSession, Rc<Counters>, Rc<Cell<bool>>) {
    let down = Rc::new(Cell::new(false));
    let store = OutageStore {
        inner: SqliteStore::open_in_memory().unwrap(),
        down: down.clone(),
    };
    let mut catalog = Catalog::open(store, FixedProbe).unwrap();
    let blobs: Vec<ImportBlob> = files
        .iter()
        .map(|f| ImportBlob::new(*f, "audio/wav", f.as_bytes().to_vec()))
        .collect();
    let report = catalog.import_files(blobs);
    assert!(report.failures.is_empty());

    let counters = Rc::new(Counters::default());
    let player = PlaybackController::new(CountingOutput(counters.clone()));
    let session = Session::new(App::new(), catalog, player, LibrarySettings::default());
    (session, counters, down)
}

fn press(s: &mut TestSession, code: KeyCode) -> bool {
    s.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text(s: &mut TestSession, text: &str) {
    for c in text.chars() {
        press(s, KeyCode::Char(c));
    }
}

fn selected_name(s: &TestSession) -> Option<String> {
    s.app.selected_sound(&s.visible()).map(|x| x.name.clone())
}

#[test]
fn q_quits_from_browse_only() {
    let (mut s, _) = session(&[]);
    press(&mut s, KeyCode::Char('/'));
    assert!(!press(&mut s, KeyCode::Char('q')));
    assert_eq!(s.app.query, "q");

    press(&mut s, KeyCode::Esc);
    assert!(press(&mut s, KeyCode::Char('q')));
}

#[test]
fn gg_and_capital_g_jump_to_ends() {
    let (mut s, _) = session(&["a.wav", "b.wav", "c.wav"]);

    press(&mut s, KeyCode::Char('G'));
    assert_eq!(s.app.selected, 2);

    press(&mut s, KeyCode::Char('g'));
    assert_eq!(s.app.selected, 2);
    press(&mut s, KeyCode::Char('g'));
    assert_eq!(s.app.selected, 0);

    // A different key between the two g's cancels the prefix.
    press(&mut s, KeyCode::Char('j'));
    press(&mut s, KeyCode::Char('g'));
    press(&mut s, KeyCode::Char('k'));
    press(&mut s, KeyCode::Char('j'));
    press(&mut s, KeyCode::Char('g'));
    assert_eq!(s.app.selected, 1);
}

#[test]
fn enter_toggles_playback_of_selection() {
    let (mut s, counters) = session(&["a.wav", "b.wav"]);

    press(&mut s, KeyCode::Enter);
    assert!(matches!(s.player.state(), PlaybackState::Playing(_)));
    assert_eq!(counters.held.get(), 1);

    press(&mut s, KeyCode::Char('j'));
    press(&mut s, KeyCode::Char(' '));
    assert_eq!(counters.held.get(), 1);

    press(&mut s, KeyCode::Char(' '));
    assert_eq!(s.player.state(), PlaybackState::Idle);
    assert_eq!(counters.held.get(), 0);
}

#[test]
fn tick_ends_finished_playback() {
    let (mut s, counters) = session(&["a.wav"]);
    press(&mut s, KeyCode::Enter);

    s.tick();
    assert!(matches!(s.player.state(), PlaybackState::Playing(_)));

    counters.finished.set(true);
    s.tick();
    assert_eq!(s.player.state(), PlaybackState::Idle);
    assert_eq!(counters.held.get(), 0);
}

#[test]
fn search_filters_visible_list() {
    let (mut s, _) = session(&["door_slam.wav", "big_whoosh.wav", "rain_ambient.wav"]);
    assert_eq!(s.visible().len(), 3);

    press(&mut s, KeyCode::Char('/'));
    type_text(&mut s, "WHOO");
    assert_eq!(s.visible().len(), 1);
    assert_eq!(selected_name(&s).as_deref(), Some("big_whoosh"));

    press(&mut s, KeyCode::Enter);
    assert_eq!(s.app.mode, Mode::Browse);
    assert_eq!(s.visible().len(), 1);

    press(&mut s, KeyCode::Char('x'));
    assert_eq!(s.visible().len(), 3);
}

#[test]
fn sidebar_enter_toggles_tag_filter() {
    let (mut s, _) = session(&["door_slam.wav", "big_whoosh.wav", "hit_boom.wav"]);

    press(&mut s, KeyCode::Tab);
    assert_eq!(s.app.focus, Focus::Tags);

    // Rows: All, Untagged, impact, transition
    press(&mut s, KeyCode::Char('j'));
    press(&mut s, KeyCode::Enter);
    assert_eq!(s.visible().len(), 1);
    assert_eq!(s.visible()[0].name, "door_slam");

    press(&mut s, KeyCode::Char('g'));
    press(&mut s, KeyCode::Char('g'));
    press(&mut s, KeyCode::Enter);
    assert!(s.app.tag_filters.is_empty());
    assert_eq!(s.visible().len(), 3);
}

#[test]
fn tag_prompt_adds_and_removes_tags() {
    let (mut s, _) = session(&["door_slam.wav"]);

    press(&mut s, KeyCode::Char('t'));
    assert!(matches!(
        s.app.mode,
        Mode::Prompt {
            kind: PromptKind::AddTag,
            ..
        }
    ));
    type_text(&mut s, " wood ");
    press(&mut s, KeyCode::Enter);
    assert_eq!(s.catalog.sounds()[0].tags, vec!["wood"]);
    assert_eq!(s.app.mode, Mode::Browse);

    press(&mut s, KeyCode::Char('T'));
    type_text(&mut s, "wood");
    press(&mut s, KeyCode::Enter);
    assert!(s.catalog.sounds()[0].tags.is_empty());
}

#[test]
fn prompt_escape_changes_nothing() {
    let (mut s, _) = session(&["door_slam.wav"]);
    press(&mut s, KeyCode::Char('t'));
    type_text(&mut s, "wood");
    press(&mut s, KeyCode::Esc);
    assert!(s.catalog.sounds()[0].tags.is_empty());
    assert_eq!(s.app.mode, Mode::Browse);
}

#[test]
fn delete_asks_first_and_stops_playback() {
    let (mut s, counters) = session(&["a.wav", "b.wav"]);
    press(&mut s, KeyCode::Enter);

    press(&mut s, KeyCode::Char('d'));
    press(&mut s, KeyCode::Char('n'));
    assert_eq!(s.catalog.len(), 2);
    assert_eq!(counters.held.get(), 1);

    press(&mut s, KeyCode::Char('d'));
    press(&mut s, KeyCode::Char('y'));
    assert_eq!(s.catalog.len(), 1);
    assert_eq!(s.player.state(), PlaybackState::Idle);
    assert_eq!(counters.held.get(), 0);
}

#[test]
fn edit_form_saves_through_catalog() {
    let (mut s, _) = session(&["door_slam.wav"]);

    press(&mut s, KeyCode::Char('e'));
    assert!(matches!(s.app.mode, Mode::Edit(_)));

    // Name: append text.
    type_text(&mut s, " 2");
    // Category: cycle to the first known category.
    press(&mut s, KeyCode::Tab);
    press(&mut s, KeyCode::Down);
    // Tags: Enter adds, then Enter saves.
    press(&mut s, KeyCode::Tab);
    press(&mut s, KeyCode::Tab);
    if let Mode::Edit(form) = &s.app.mode {
        assert_eq!(form.field, FormField::Tags);
    }
    type_text(&mut s, "wood");
    press(&mut s, KeyCode::Enter);
    assert!(matches!(s.app.mode, Mode::Edit(_)));
    press(&mut s, KeyCode::Enter);

    assert_eq!(s.app.mode, Mode::Browse);
    let sound = &s.catalog.sounds()[0];
    assert_eq!(sound.name, "door_slam 2");
    assert_eq!(sound.category.as_deref(), Some("Transition"));
    assert_eq!(sound.tags, vec!["wood"]);
    assert_eq!(sound.file_name, "door_slam.wav");
}

#[test]
fn edit_form_escape_discards_changes() {
    let (mut s, _) = session(&["door_slam.wav"]);
    press(&mut s, KeyCode::Char('e'));
    type_text(&mut s, "xyz");
    press(&mut s, KeyCode::Esc);

    assert_eq!(s.app.mode, Mode::Browse);
    assert_eq!(s.catalog.sounds()[0].name, "door_slam");
}

#[test]
fn ctrl_s_saves_edit_form() {
    let (mut s, _) = session(&["door_slam.wav"]);
    press(&mut s, KeyCode::Char('e'));
    press(&mut s, KeyCode::Backspace);
    s.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));

    assert_eq!(s.app.mode, Mode::Browse);
    assert_eq!(s.catalog.sounds()[0].name, "door_sla");
}

#[test]
fn import_prompt_reports_missing_path() {
    let (mut s, _) = session(&[]);
    press(&mut s, KeyCode::Char('i'));
    type_text(&mut s, "/definitely/not/here.wav");
    press(&mut s, KeyCode::Enter);

    assert!(s.catalog.is_empty());
    let status = s.app.status.clone().unwrap_or_default();
    assert!(status.contains("unreadable 1"), "{status}");
}

#[test]
fn import_from_directory_adds_sounds() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("whoosh.wav"), b"RIFF").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();

    let (mut s, _) = session(&[]);
    s.import(&[dir.path().to_path_buf()]);

    assert_eq!(s.catalog.len(), 1);
    assert_eq!(s.catalog.sounds()[0].category.as_deref(), Some("Transition"));
    assert_eq!(s.app.status.as_deref(), Some("imported 1"));
}

#[test]
fn selection_is_clamped_after_delete() {
    let (mut s, _) = session(&["a.wav", "b.wav"]);
    press(&mut s, KeyCode::Char('G'));
    press(&mut s, KeyCode::Char('d'));
    press(&mut s, KeyCode::Char('y'));
    assert_eq!(s.app.selected, 0);
    assert!(selected_name(&s).is_some());
}

#[test]
fn delete_stops_playback_even_when_reload_fails() {
    let (mut s, counters, down) = session_with_outage(&["a.wav"]);
    press(&mut s, KeyCode::Enter);
    let id = s.visible()[0].id;
    assert_eq!(s.player.state(), PlaybackState::Playing(id));

    down.set(true);
    press(&mut s, KeyCode::Char('d'));
    press(&mut s, KeyCode::Char('y'));

    assert!(s.catalog.store().fetch_one(&id).is_err());
    assert_eq!(s.player.state(), PlaybackState::Idle);
    assert_eq!(counters.held.get(), 0);
    let status = s.app.status.clone().unwrap_or_default();
    assert!(status.starts_with("deleted"), "{status}");
    assert!(!status.contains("delete failed"), "{status}");
}
