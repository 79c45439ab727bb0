use std::env;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::{PlaybackController, RodioOutput};
use crate::catalog::Catalog;
use crate::library::{LoftyProbe, SqliteStore, TimedProbe};

mod event_loop;
mod logging;
mod settings;
mod startup;

pub use event_loop::Session;
pub use startup::import_paths;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_problem) = settings::load_settings();

    // Logging must never keep the app from starting.
    let logging_problem = match logging::init(&settings) {
        Ok(path) => {
            info!(log = %path.display(), "sfx-memory starting");
            None
        }
        Err(e) => Some(format!("logging disabled: {e}")),
    };
    if let Some(msg) = &settings_problem {
        warn!("{msg}");
    }

    let db_path = settings
        .database_path()
        .ok_or("cannot determine where to keep the library; set library.database_path")?;
    let store = SqliteStore::open(&db_path)?;
    let probe = TimedProbe::new(
        LoftyProbe,
        Duration::from_millis(settings.library.probe_timeout_ms),
    );
    let catalog = Catalog::open(store, probe)?;
    info!(db = %db_path.display(), sounds = catalog.len(), "library opened");

    let output = RodioOutput::open_default()?;
    let player = PlaybackController::new(output);

    let mut app = App::new();
    app.show_notes = settings.ui.show_notes;
    if let Some(msg) = settings_problem.or(logging_problem) {
        app.set_status(msg);
    }

    let mut session = Session::new(app, catalog, player, settings.library.clone());
    let args: Vec<String> = env::args().skip(1).collect();
    if let Some(msg) = startup::import_args(&mut session.catalog, args, &settings.library) {
        session.app.set_status(msg);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut session);
    session.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("sfx-memory exiting");
    run_result
}
