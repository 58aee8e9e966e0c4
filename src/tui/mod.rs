pub mod app;
pub mod ui;
pub mod widgets;

use crate::config::Config;
use crate::permissions::SystemGate;
use crate::scanner::{ScanEngine, ScanEvent};
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::LevelFilter;
use ratatui::prelude::*;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

pub use app::{ActivePanel, App, Stats};

/// Setup terminal for TUI mode
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI application
pub async fn run_tui(config: Config) -> Result<()> {
    // Disable logging to prevent interference with TUI display
    log::set_max_level(LevelFilter::Off);

    // Create event channel
    let (event_tx, event_rx) = mpsc::channel::<ScanEvent>(1000);

    // Create running flag
    let running = Arc::new(AtomicBool::new(true));

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    // Spawn scan engine task
    let gate = SystemGate::probe().await;
    let mut engine = ScanEngine::new(config.clone(), gate, running.clone());
    let engine_handle = tokio::spawn(async move { engine.run(event_tx).await });

    // Create app
    let mut app = App::new(event_rx, &config);

    // Setup terminal
    let mut terminal = setup_terminal()?;

    // Run event loop
    let tick_rate = Duration::from_millis(50); // 20 FPS for efficiency

    let result = run_event_loop(&mut terminal, &mut app, tick_rate, running.clone()).await;

    // Stop scanning; the engine releases the radio before exiting
    running.store(false, Ordering::SeqCst);
    let _ = tokio::time::timeout(Duration::from_secs(2), engine_handle).await;
    restore_terminal(&mut terminal)?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
    running: Arc<AtomicBool>,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        // Draw UI
        terminal.draw(|f| ui::draw(f, app))?;

        // Calculate timeout
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());

        // Poll for events
        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => {
                            app.running = false;
                        }
                        KeyCode::Char('?') => {
                            app.show_help = !app.show_help;
                        }
                        KeyCode::Tab | KeyCode::Right => {
                            app.next_panel();
                        }
                        KeyCode::BackTab | KeyCode::Left => {
                            app.prev_panel();
                        }
                        KeyCode::Down | KeyCode::Char('j') => {
                            app.scroll_down();
                        }
                        KeyCode::Up | KeyCode::Char('k') => {
                            app.scroll_up();
                        }
                        KeyCode::Esc => {
                            if app.show_help {
                                app.show_help = false;
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        // Process scan events from the engine task
        while let Ok(scan_event) = app.event_rx.try_recv() {
            app.handle_event(scan_event);
        }

        // Tick
        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if !app.running {
            running.store(false, Ordering::SeqCst);
            break;
        }
    }

    Ok(())
}
