//! vlogfeed - terminal browser and HTML exporter for a channel's video feed.
//!
//! Main entry point and event loop for the application.

mod app;
mod cards;
mod config;
mod error;
mod feed;
mod ui;

use app::{App, FeedPhase, UiMode};
use config::Config;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use feed::FeedLoader;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

/// Main application entry point.
///
/// # Details
/// Loads configuration, spawns the initial feed load, then runs the
/// terminal event loop.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load(None)?;

    if config.channel_id.trim().is_empty() {
        eprintln!("Error: channel_id is required.");
        eprintln!(
            "Please create a config file at: {}",
            Config::default_config_path()?.display()
        );
        eprintln!("See config.jsonc.example for a template.");
        return Err(anyhow::anyhow!("channel_id not configured"));
    }

    let loader = match FeedLoader::new(&config) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Set api_key (Data API mode) or rss_proxy (feed mode) in the config file.");
            return Err(e.into());
        }
    };

    let mut app = App::new();
    app.api_mode = loader.api_mode();

    // Initial load; the UI shows the loading placeholder until it resolves.
    start_load(&mut app, &loader, String::new());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let result = run_app(&mut terminal, &mut app, &loader, &config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Spawn an initial/search load, superseding any in-flight one.
///
/// # Details
/// The load carries the session generation; by the time it resolves a newer
/// load may have been issued, in which case the result is dropped.
fn start_load(app: &mut App, loader: &FeedLoader, term: String) {
    let generation = app.begin_load(&term);
    let loader = loader.clone();
    app.load_task = Some(tokio::spawn(async move {
        (generation, loader.load(&term).await)
    }));
}

/// Spawn a "load more" fetch if the session allows one.
///
/// # Details
/// No-op unless API mode is active, no search term is set and a page token
/// is stored. The fetch carries the session generation like the initial
/// load does, so a next page of a superseded listing is dropped instead of
/// being appended to newer results. The in-flight guard is set here and
/// released when the result is applied, whatever the outcome.
fn start_load_more(app: &mut App, loader: &FeedLoader) {
    if !app.can_load_more() {
        return;
    }
    let Some(token) = app.session.next_page_token.clone() else {
        return;
    };
    let generation = app.session.generation;
    app.loading_more = true;
    app.set_status("Loading more videos...".to_string());
    let loader = loader.clone();
    app.more_task = Some(tokio::spawn(async move {
        (generation, loader.load_more(&token).await)
    }));
}

/// Harvest finished fetch tasks and fold their results into the state.
async fn harvest_tasks(app: &mut App) {
    if app.load_task.as_ref().is_some_and(|task| task.is_finished())
        && let Some(task) = app.load_task.take()
    {
        match task.await {
            Ok((generation, result)) => {
                app.apply_load(generation, result);
            }
            Err(e) => {
                app.phase = FeedPhase::Failed(format!("load task failed: {e}"));
            }
        }
    }

    if app.more_task.as_ref().is_some_and(|task| task.is_finished())
        && let Some(task) = app.more_task.take()
    {
        match task.await {
            Ok((generation, result)) => {
                app.apply_more(generation, result);
            }
            Err(e) => {
                app.loading_more = false;
                app.set_status(format!("Load more task failed: {e}"));
            }
        }
    }
}

/// Render the complete UI.
///
/// # Details
/// Search bar on top, video list (or error panel) in the middle, status
/// bar with key hints at the bottom.
fn render_ui(f: &mut ratatui::Frame, app: &App) {
    let chunks = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            ratatui::layout::Constraint::Length(3), // Search bar
            ratatui::layout::Constraint::Min(0),    // Video list / error panel
            ratatui::layout::Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    ui::render_search(app, chunks[0], f.buffer_mut());

    if let FeedPhase::Failed(message) = &app.phase {
        ui::render_error(message, chunks[1], f.buffer_mut());
    } else {
        ui::render_list(app, chunks[1], f.buffer_mut());
    }

    let status_text = app.status_message.as_deref().unwrap_or(
        "q: quit · /: search · Enter: watch · m: load more · r: reload · e: export grid",
    );
    let status = ratatui::widgets::Paragraph::new(ratatui::text::Line::from(status_text))
        .block(ratatui::widgets::Block::default().borders(ratatui::widgets::Borders::ALL));
    f.render_widget(status, chunks[2]);
}

/// Main event loop.
///
/// # Details
/// Each tick renders, fires any due debounced search, harvests finished
/// fetches and then polls for input with a short timeout to stay
/// responsive.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    loader: &FeedLoader,
    config: &Config,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        // A debounce window may have elapsed since the last keystroke.
        if let Some(term) = app.take_due_search(Instant::now()) {
            start_load(app, loader, term);
        }

        harvest_tasks(app).await;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    match app.mode {
                        UiMode::List => match key.code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => break,
                            KeyCode::Char('c')
                                if key.modifiers.contains(event::KeyModifiers::CONTROL) =>
                            {
                                break;
                            }
                            KeyCode::Up | KeyCode::Char('k') => app.move_up(),
                            KeyCode::Down | KeyCode::Char('j') => app.move_down(),
                            KeyCode::Enter => {
                                if let Some(video) = app.selected_video() {
                                    let url = video.url.clone();
                                    let title = video.title.clone();
                                    match webbrowser::open(&url) {
                                        Ok(()) => app.set_status(format!("Opened: {}", title)),
                                        Err(e) => {
                                            app.set_status(format!("Failed to open video: {}", e));
                                        }
                                    }
                                }
                            }
                            KeyCode::Char('/') => {
                                app.mode = UiMode::Search;
                            }
                            KeyCode::Char('m') => {
                                start_load_more(app, loader);
                            }
                            KeyCode::Char('r') => {
                                let term = app.session.search_term.clone();
                                start_load(app, loader, term);
                            }
                            KeyCode::Char('e') => {
                                let path = Path::new(&config.export_path);
                                match cards::write_grid(path, &app.videos, &app.session.search_term)
                                {
                                    Ok(()) => {
                                        app.set_status(format!("Exported to {}", path.display()));
                                    }
                                    Err(e) => app.set_status(format!("Export failed: {}", e)),
                                }
                            }
                            _ => {}
                        },
                        UiMode::Search => match key.code {
                            KeyCode::Enter => {
                                // Bypass the debounce and fire immediately.
                                let term = app.confirm_search();
                                start_load(app, loader, term);
                                app.mode = UiMode::List;
                            }
                            KeyCode::Esc => {
                                app.mode = UiMode::List;
                            }
                            KeyCode::Backspace => {
                                app.search_input.pop();
                                app.note_search_edit(Instant::now());
                            }
                            KeyCode::Char(c) => {
                                app.search_input.push(c);
                                app.note_search_edit(Instant::now());
                            }
                            _ => {}
                        },
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, app),
                _ => {}
            }
        }
        // If no event, continue loop to redraw UI (keeps it responsive)
    }

    Ok(())
}

/// Handle mouse scroll for list navigation.
fn handle_mouse_event(mouse: MouseEvent, app: &mut App) {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            if app.mode == UiMode::List {
                app.move_up();
            }
        }
        MouseEventKind::ScrollDown => {
            if app.mode == UiMode::List {
                app.move_down();
            }
        }
        _ => {}
    }
}
