mod app;
mod ui;

pub use app::{App, InputMode};

use anyhow::Result;
use catalog_core::StatusFilter;
use catalog_pipeline::{CatalogPipeline, CatalogTransport};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;

pub async fn run<T: CatalogTransport>(pipeline: CatalogPipeline<T>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(pipeline);

    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B: ratatui::backend::Backend, T: CatalogTransport>(
    terminal: &mut Terminal<B>,
    app: &mut App<T>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // Draw the loading view first, then fetch
        if app.fetch_pending() {
            app.run_pending_fetch().await;
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match app.input_mode {
                InputMode::Normal => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('?') => app.toggle_help(),
                    KeyCode::Char('j') | KeyCode::Down => app.next(),
                    KeyCode::Char('k') | KeyCode::Up => app.previous(),
                    KeyCode::Char('/') => app.start_search(),
                    KeyCode::Char('1') => app.set_filter(StatusFilter::All),
                    KeyCode::Char('2') => app.set_filter(StatusFilter::InStock),
                    KeyCode::Char('3') => app.set_filter(StatusFilter::OutOfStock),
                    KeyCode::Char('4') => app.set_filter(StatusFilter::LowStock),
                    KeyCode::Char('s') => app.cycle_sort(),
                    KeyCode::Char('x') => app.reset_filters(),
                    KeyCode::Char('c') | KeyCode::Enter => app.show_contact(),
                    KeyCode::Char('r') => app.request_refresh(),
                    _ => {}
                },
                InputMode::Searching => match key.code {
                    KeyCode::Enter => app.finish_search(),
                    KeyCode::Esc => app.cancel_search(),
                    KeyCode::Backspace => app.input_backspace(),
                    KeyCode::Char(c) => app.input_char(c),
                    _ => {}
                },
                InputMode::ShowingHelp => match key.code {
                    KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => app.toggle_help(),
                    _ => {}
                },
            }
        }
    }
}
