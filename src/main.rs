use anyhow::{Context, Result};
use atct_map::app::App;
use atct_map::capabilities::Capabilities;
use atct_map::config::{Cli, MapOptions};
use atct_map::data::spawn_loaders;
use atct_map::logging::{default_log_file, init_logging};
use atct_map::map::BaseLayer;
use atct_map::ui;
use clap::Parser;
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use std::time::Duration;
use tracing::{error, info, warn};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = cli.map_options()?;
    let _log_guard = init_logging(&cli.log_dir, default_log_file())
        .with_context(|| format!("cannot open log directory {}", cli.log_dir.display()))?;

    let caps = Capabilities::detect(options.detect_retina);
    info!(?options, ?caps, "starting");

    let base = match &options.basemap {
        Some(path) => BaseLayer::from_file(path).unwrap_or_else(|err| {
            warn!(error = %err, "basemap unavailable, using built-in outline");
            BaseLayer::builtin()
        }),
        None => BaseLayer::builtin(),
    };

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture, EnableFocusChange)?;

    let result = run(&mut terminal, &options, base, caps);

    let _ = execute!(std::io::stdout(), DisableFocusChange, DisableMouseCapture);
    ratatui::restore();

    if let Err(err) = &result {
        error!(error = %err, "exited with error");
    }
    info!("stopped");
    result
}

/// Hover, click, drag and wheel handling
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved => app.pointer_moved(mouse.column, mouse.row),
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => app.mouse_down(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.handle_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.mouse_up(mouse.column, mouse.row),
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, options: &MapOptions, base: BaseLayer, caps: Capabilities) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(size.width as usize, size.height as usize, options, base, caps);

    // Both layers load in the background and attach whenever they finish
    let loads = spawn_loaders(&options.datasets);

    loop {
        while let Ok(load) = loads.try_recv() {
            app.handle_load(load);
        }

        terminal.draw(|frame| ui::render(frame, &app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') => app.quit(),
                    KeyCode::Esc => app.escape(),

                    // Pan with hjkl or arrow keys
                    KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
                    KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
                    KeyCode::Up | KeyCode::Char('k') => app.pan(0, -8),
                    KeyCode::Down | KeyCode::Char('j') => app.pan(0, 8),

                    // Zoom
                    KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                    // Layer toggles
                    KeyCode::Char('b') | KeyCode::Char('B') => app.toggle_base(),
                    KeyCode::Char('s') | KeyCode::Char('S') => app.toggle_states(),
                    KeyCode::Char('a') | KeyCode::Char('A') => app.toggle_airports(),

                    KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),
                    _ => {}
                },
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::FocusLost => app.pointer_left(),
                Event::Resize(width, height) => app.resize(width as usize, height as usize),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
