//! basket - grocery list in your terminal
//!
//! - Add, complete and delete items (completed ones sink to the bottom)
//! - Clear all completed items at once
//! - Ask an LLM for a recipe built from what is still on the list
//! - Schedule a quick shopping reminder notification
//!
//! Usage: basket [--help] [--version]

mod app;
mod config;
mod groceries;
mod logging;
mod services;
mod types;
mod ui;

use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|a| a == "--version" || a == "-v") {
        println!("basket {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if let Err(e) = run_app() {
        tracing::error!("fatal: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn print_help() {
    println!(
        r#"basket - grocery list in your terminal

USAGE:
    basket [OPTIONS]

OPTIONS:
    -h, --help       Print help information
    -v, --version    Print version information

KEYBINDINGS:
    i / a            Type a new item (Enter adds, Esc leaves)
    j/k, ↑/↓         Move selection
    Space / Enter    Toggle completed
    d / Del          Delete item (asks first)
    c                Clear completed items (asks first)
    r                Recipe idea from the open items
    n                Remind me in 5 seconds
    t                Cycle theme
    q                Quit

CONFIG:
    ~/.config/basket/config.toml
    API key: api_key in the config, or GROQ_API_KEY in the environment

DATA & LOGS:
    ~/.local/share/basket/
"#
    );
}

fn run_app() -> Result<()> {
    // Load configuration
    let config = config::Config::load().context("Failed to load configuration")?;

    // Logging is best-effort; the list works without it
    match logging::log_path() {
        Ok(path) => {
            if let Err(e) = logging::init(&path, &config.log_level) {
                eprintln!("Warning: {:#}", e);
            }
        }
        Err(e) => eprintln!("Warning: {:#}", e),
    }

    // Create application state (restores the stored list)
    let mut app = App::from_config(config).context("Failed to initialize application")?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Install panic handler so terminal is restored on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
        let _ = execute!(std::io::stdout(), crossterm::cursor::Show);
        original_hook(info);
    }));

    // Run main loop
    let result = main_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    tracing::info!(items = app.store.len(), "basket exiting");
    result
}

fn main_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            ui::render(frame, app);
        })?;

        // Flash expiry + recipe result polling
        app.update_timers()?;

        // Poll for events with timeout so the spinner keeps moving
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key)?;
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
