//! jobform - Terminal Job Application Wizard
//!
//! A five-step job application form for the terminal. Steps validate
//! before forward movement, drafts persist to a JSON file (manually,
//! on step changes, and every 30 seconds), and the final step reviews
//! and submits the whole application.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod domain;
mod application;
mod infrastructure;
mod presentation;

use application::{App, AppMode, DRAFT_FILE};
use infrastructure::{
    DraftRepository, HttpSubmissionClient, HttpUsernameDirectory, LoggingSubmissionClient,
    StubUsernameDirectory,
};
use presentation::{render_ui, InputHandler, Services};

const LOG_FILE: &str = "jobform.log";

/// The terminal owns stdout, so log lines go to a file. Level defaults
/// to info and follows `RUST_LOG` when set.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();
    Ok(())
}

/// Wires the external collaborators from the environment. Without
/// configured endpoints the wizard runs fully offline against the stub
/// directory and the logging submission sink.
fn build_services() -> Services {
    let username_directory: Box<dyn infrastructure::UsernameDirectory> =
        match std::env::var("JOBFORM_USERNAME_ENDPOINT") {
            Ok(endpoint) => Box::new(HttpUsernameDirectory::new(endpoint)),
            Err(_) => Box::new(StubUsernameDirectory),
        };
    let submission: Box<dyn infrastructure::SubmissionClient> =
        match std::env::var("JOBFORM_SUBMIT_ENDPOINT") {
            Ok(endpoint) => Box::new(HttpSubmissionClient::new(endpoint)),
            Err(_) => Box::new(LoggingSubmissionClient),
        };
    Services {
        username_directory,
        submission,
    }
}

fn draft_path() -> PathBuf {
    std::env::var("JOBFORM_DRAFT_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DRAFT_FILE))
}

/// Entry point for the jobform terminal application.
///
/// Sets up logging and the terminal interface, initializes the wizard
/// state (offering to load a saved draft when one exists), and runs the
/// main event loop until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup fails or if there are issues
/// with the terminal interface during runtime.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let draft_path = draft_path();
    let draft_available = DraftRepository::draft_available(&draft_path);
    let mut app = App::new(draft_path, draft_available);
    let services = build_services();
    let res = run_app(&mut terminal, &mut app, &services);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Main application event loop.
///
/// Renders the wizard, processes keyboard input, and fires the 30-second
/// draft auto-save on poll ticks. Continues running until the user
/// presses 'q' in form mode.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    services: &Services,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if matches!(app.mode, AppMode::Form) => {
                            return Ok(());
                        }
                        _ => InputHandler::handle_key_event(
                            app,
                            key.code,
                            key.modifiers,
                            services,
                        ),
                    }
                }
            }
        }

        // The auto-save stays quiet while the startup prompt is open so a
        // blank record can never clobber the draft being offered.
        if app.mode != AppMode::DraftPrompt && app.autosave_due(Instant::now()) {
            match DraftRepository::save_draft(&app.record, &app.draft_path) {
                Ok(()) => {
                    app.draft_available = true;
                    debug!("draft auto-saved");
                }
                Err(error) => warn!(error = %error, "draft auto-save failed"),
            }
        }
    }
}
