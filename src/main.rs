//! apod-gallery — NASA's Astronomy Picture of the Day, in the terminal.
//!
//! ## Data flow
//!
//! ```text
//!                   request(range)  ┌──────────┐
//!            ┌────────────────────► │ fetch.rs │  one worker thread
//!            │                      │ (thread) │  per request
//!            │                      └──────────┘
//!            │                           │ FetchMsg (channel)
//!       ┌──────────┐                     ▼
//!       │  app.rs  │ ◄──────────── drain_fetches()
//!       │ (state)  │ ───────► ui.rs (render)
//!       └──────────┘
//!            ▲
//!            │ handle_event()
//!       ┌──────────┐
//!       │ input.rs │
//!       └──────────┘
//! ```
//!
//! * **`range`** — validates the date fields into a `DateRange`.
//! * **`source/`** — the `FeedSource` trait, the API and static-document
//!   sources, and normalization of raw records into `FeedItem`s.
//! * **`fetch`** — runs each request on a worker thread; the UI keeps only
//!   the newest response.
//! * **`gallery`** / **`modal`** — card list and detail view state.
//! * **`app`** — owns all application state.
//! * **`ui`** — draws `App` state and records clickable regions.
//! * **`input`** — maps key and mouse events to `App` mutations.
//! * **`config`** / **`logging`** — command line, config file, log file.
//! * **`main`** — loads settings, owns the terminal and the tick loop.

mod app;
mod config;
mod error;
mod fetch;
mod gallery;
mod input;
mod logging;
mod modal;
mod range;
mod source;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use config::{Cli, Config};
use fetch::Fetcher;

// ---------------------------------------------------------------------------
// Terminal setup / teardown
// ---------------------------------------------------------------------------

/// Owns the terminal while the gallery is on screen.
///
/// `new` switches to raw mode, the alternate screen and mouse reporting;
/// dropping the guard switches all three back, including while unwinding.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the default hook prints a panic, so the
/// message lands on the normal screen and in the log file.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        log::error!("panic: {info}");
        original_hook(info);
    }));
}

fn main() -> Result<()> {
    // -- configuration and logging -------------------------------------------
    let config = Config::load(Cli::parse())?;
    logging::init(&config.log_file, config.log_level)?;
    log::info!(
        "Starting {} v{} ({:?} mode)",
        config::APP_NAME,
        env!("CARGO_PKG_VERSION"),
        config.mode
    );

    let source = config.build_source()?;
    let mut app = App::new(Fetcher::new(source));
    app.start_input = config.start.clone().unwrap_or_default();
    app.end_input = config.end.clone().unwrap_or_default();
    if config.fetch_on_startup() {
        app.submit();
    }

    install_panic_hook();

    let mut guard = TerminalGuard::new()?;

    // Apply finished fetches, redraw, then wait up to one tick for input.
    let tick_rate = Duration::from_millis(100);

    loop {
        app.drain_fetches();

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            input::handle_event(&mut app, event::read()?);
        }

        if app.quit {
            break;
        }
    }

    log::info!("Exiting");
    Ok(())
}
