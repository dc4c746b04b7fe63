mod config;
mod dashboard;
mod tui;

use anyhow::{Context, Result};
use clap::{Command, CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::{Generator, Shell, generate};
use config::{Config, ConfigError, KEYS};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dashboard::exporter::ExportFormat;
use dashboard::importer;
use dashboard::metrics::{self, format_change, format_value};
use dashboard::models::{DashboardState, Metric, Period, default_state};
use dashboard::session::Session;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tui::{app::App, ui};

#[derive(Parser)]
#[command(name = "kpiboard")]
#[command(about = "A terminal dashboard comparing project KPIs across two periods")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Export the dashboard to CSV, XLSX or an SVG report")]
    Export {
        #[arg(help = "Output file; the format follows the extension", value_hint = ValueHint::FilePath)]
        output: PathBuf,
        #[arg(long, help = "Import projects from this CSV/XLSX file first", value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
    },
    #[command(about = "Print KPI totals and per-project figures")]
    Summary {
        #[arg(long, help = "Import projects from this CSV/XLSX file first", value_hint = ValueHint::FilePath)]
        input: Option<PathBuf>,
    },
    #[command(about = "Configuration management")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    #[command(about = "Generate shell completion scripts")]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    #[command(about = "Set a configuration value (an empty value resets it)")]
    Set {
        #[arg(help = "Configuration key: seed_file, export_dir or log_file")]
        key: String,
        #[arg(help = "Configuration value", value_hint = ValueHint::AnyPath)]
        value: String,
    },
    #[command(about = "Get a configuration value")]
    Get {
        #[arg(help = "Configuration key")]
        key: String,
    },
    #[command(about = "List all configuration values")]
    List,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Config { action }) => {
            handle_config_command(action).map_err(anyhow::Error::from)
        }
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
            Ok(())
        }
        Some(Commands::Export { output, input }) => run_export(&output, input.as_deref()),
        Some(Commands::Summary { input }) => run_summary(input.as_deref()),
        None => run_main_app(),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn handle_config_command(action: ConfigAction) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, value)?;
            config.save()?;
            println!("Configuration saved successfully.");
        }
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for key in KEYS {
                println!("{} = {}", key, config.get(key)?);
            }
        }
    }
    Ok(())
}

fn init_logging(config: &Config) {
    let Some(path) = config.log_file_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }

    // The TUI owns the terminal, so log lines go to a file.
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn load_config() -> Result<Config> {
    let config = Config::load().context("Configuration error")?;
    init_logging(&config);
    Ok(config)
}

fn build_session(config: &Config, input: Option<&Path>) -> Result<Session> {
    let seed = match &config.seed_file {
        Some(path) => {
            let projects = importer::import_projects(Path::new(path))
                .with_context(|| format!("Failed to load seed file {}", path))?;
            log::info!("seeded {} projects from {}", projects.len(), path);
            DashboardState::new(projects)
        }
        None => default_state(),
    };

    let mut session = Session::new(seed);
    if let Some(input) = input {
        session
            .import_file(input)
            .with_context(|| format!("Failed to import {}", input.display()))?;
    }
    Ok(session)
}

fn run_export(output: &Path, input: Option<&Path>) -> Result<()> {
    let config = load_config()?;
    let session = build_session(&config, input)?;

    let format = ExportFormat::from_path(output)?;
    session
        .export(output, format)
        .with_context(|| format!("Failed to export to {}", output.display()))?;

    println!(
        "Exported {} projects to {}",
        session.state().total_projects(),
        output.display()
    );
    Ok(())
}

fn run_summary(input: Option<&Path>) -> Result<()> {
    let config = load_config()?;
    let session = build_session(&config, input)?;
    let state = session.state();

    println!("{}", state.dashboard_title);
    println!("{} vs {}", state.period_a_header, state.period_b_header);
    println!();

    for card in metrics::kpi_cards(state) {
        println!(
            "{:<16} {:>16} -> {:>16}  {}",
            card.title,
            format_value(card.metric, card.period_a),
            format_value(card.metric, card.period_b),
            format_change(card.change)
        );
    }

    println!();
    println!("{}", state.table_title);
    for project in &state.projects {
        let figures: Vec<String> = Metric::ALL
            .iter()
            .map(|metric| {
                let a = metrics::metric_value(project, Period::A, *metric);
                let b = metrics::metric_value(project, Period::B, *metric);
                format!(
                    "{} {} -> {}",
                    metric.label(),
                    format_value(*metric, a),
                    format_value(*metric, b)
                )
            })
            .collect();
        println!("{:>3}  {:<24} {}", project.id, project.name, figures.join(" | "));
    }
    Ok(())
}

fn run_main_app() -> Result<()> {
    let config = load_config()?;
    let session = build_session(&config, None)?;
    let mut app = App::new(session, PathBuf::from(&config.export_dir));

    log::info!("starting dashboard with {} projects", app.session.state().total_projects());
    run_tui(&mut app)?;

    Ok(())
}

fn run_tui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app);

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

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key_event(key)?;
            if app.should_quit {
                break;
            }
        }
    }
    Ok(())
}

fn print_completions<G: Generator>(generator: G, cmd: &mut Command) {
    generate(generator, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
