use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use pointmark::{
    app::App,
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore, GameConfig},
    image_source::ImageSource,
    runtime::{CrosstermEventSource, DrillEvent, FixedTicker, Runner},
    ui,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

/// spot-the-point visual memory trainer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Mark points on a reference image, then relocate them on a blank canvas of the same shape. Marks within the tolerance (a percentage of the image diagonal) count as hits."
)]
pub struct Cli {
    /// image file or URL to start with
    #[clap(short = 'i', long)]
    image: Option<String>,

    /// number of reference points per round
    #[clap(short = 'p', long)]
    points: Option<usize>,

    /// hit tolerance as a percentage of the image diagonal
    #[clap(short = 't', long, value_parser = parse_tolerance)]
    tolerance: Option<f64>,

    /// failed attempts allowed before the round ends
    #[clap(short = 'f', long)]
    max_failed: Option<u32>,

    /// config file to read settings from
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// save the effective settings to the config file and exit
    #[clap(long)]
    write_config: bool,

    /// where to write the log
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// print the final round stats as JSON on exit
    #[clap(long)]
    summary_json: bool,
}

/// Tolerance override: a finite, non-negative percentage
fn parse_tolerance(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("`{s}` is not a finite, non-negative percentage"))
    }
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Command line overrides applied on top of the stored settings
    fn apply_overrides(&self, stored: GameConfig) -> GameConfig {
        GameConfig {
            point_count: self.points.unwrap_or(stored.point_count),
            tolerance_percent: self.tolerance.unwrap_or(stored.tolerance_percent),
            max_failed_attempts: self.max_failed.unwrap_or(stored.max_failed_attempts),
        }
        .clamped()
    }
}

/// Route tracing output to a file; the terminal belongs to the TUI
fn init_logging(path: Option<&Path>) {
    let Some(path) = path else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().or_else(AppDirs::log_path);
    init_logging(log_path.as_deref());

    let store = cli.config_store();
    let config = cli.apply_overrides(store.load());

    if cli.write_config {
        store.save(&config)?;
        println!("wrote {}", store.path().display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(config);
    if let Some(input) = &cli.image {
        match ImageSource::parse(input) {
            Some(source) => {
                if let Err(e) = app.load_image(&source) {
                    app.input = input.clone();
                    app.load_error = Some(e.to_string());
                }
            }
            None => app.load_error = Some("enter a file path or URL".to_string()),
        }
    }

    tracing::info!(?config, "starting session");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result?;

    if cli.summary_json {
        println!("{}", serde_json::to_string(&app.summary_record())?);
    } else {
        println!("{}", app.summary());
    }
    tracing::info!(summary = %app.summary(), "session ended");

    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| ui::draw(app, f))?;

    while !app.should_quit {
        let event = runner.step();
        let redraw = match &event {
            // ticks only matter while something is moving on screen
            DrillEvent::Tick => app.is_animating(),
            _ => true,
        };
        app.handle_event(event);
        if redraw || app.is_animating() {
            terminal.draw(|f| ui::draw(app, f))?;
        }
    }

    Ok(())
}
