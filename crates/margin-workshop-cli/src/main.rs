mod app;
mod selection;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use margin_workshop_config::Config;
use margin_workshop_engine::io;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env,
    fs::File,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

use crate::app::App;

/// Log to a file next to the config: stderr belongs to the terminal UI.
fn init_logging() {
    let log_path = Config::config_path().with_file_name("margin-workshop.log");
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let Ok(file) = File::create(&log_path) else {
        return;
    };
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

fn main() -> Result<()> {
    init_logging();

    // Determine manuscripts path from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) if args.len() == 2 => {
            log::warn!("ignoring config file: {e}");
            None
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Usage: {} [manuscripts-folder-path]", args[0]);
            process::exit(1);
        }
    };

    let (manuscripts_path, from_config) = match (args.len(), &config) {
        (2, _) => (PathBuf::from(&args[1]), false),
        (1, Some(config)) => (config.manuscripts_path.clone(), true),
        (1, None) => {
            eprintln!("Error: No manuscripts path provided and no config file found");
            eprintln!("Usage: {} <manuscripts-folder-path>", args[0]);
            eprintln!("Or create a config file at {}", config_path.display());
            process::exit(1);
        }
        _ => {
            eprintln!("Usage: {} [manuscripts-folder-path]", args[0]);
            process::exit(1);
        }
    };

    if let Err(e) = io::validate_manuscripts_dir(&manuscripts_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Manuscripts path '{}'{} is invalid: {e}",
            manuscripts_path.display(),
            source
        );
        process::exit(1);
    }

    let reviewer = config
        .as_ref()
        .and_then(Config::reviewer)
        .or_else(|| env::var("USER").ok());
    log::info!(
        "reviewing {} as {}",
        manuscripts_path.display(),
        reviewer.as_deref().unwrap_or("anonymous")
    );

    let mut app = App::new(manuscripts_path, reviewer)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("{err:?}");
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && !app.handle_key(key)?
        {
            return Ok(());
        }
    }
}
