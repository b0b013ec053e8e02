use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use tiltbar::config::Settings;
use tiltbar::logging::{init_logging, LogLevel, LogTarget, LoggingConfig};
use tiltbar::simulate::{simulate, write_report, ReportFormat, SimulationPlan};
use tiltbar::ui::Theme;
use tiltbar::{Result, TiltbarError};

/// Output format for simulation reports
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum CliFormat {
    /// One readable line per snapshot
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl From<CliFormat> for ReportFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => ReportFormat::Text,
            CliFormat::Json => ReportFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tiltbar")]
#[command(version)]
#[command(about = "A progress bar rendered as a tilting vessel of liquid")]
struct Cli {
    /// Path to a TOML settings file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Start with voice-over mode enabled
    #[arg(long, global = true)]
    voiceover: bool,

    /// Frame rate (overrides settings)
    #[arg(long, global = true, value_name = "FPS")]
    fps: Option<u32>,

    /// Disable colors (also respects NO_COLOR environment variable)
    #[arg(long, global = true)]
    no_color: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the interactive widget (default behavior if no command given)
    Run,
    /// Run the widget headless on a virtual clock and print snapshots
    Simulate {
        /// Drag gesture in pixels, positive is downward (repeatable)
        #[arg(long, value_name = "PIXELS", allow_hyphen_values = true)]
        drag: Vec<f64>,

        /// Number of frames to run
        #[arg(long, default_value = "60")]
        frames: u64,

        /// Print a snapshot every N frames (0 = final frame only)
        #[arg(long, default_value = "0")]
        every: u64,

        /// Output format
        #[arg(long, short = 'f', default_value = "text", value_enum)]
        format: CliFormat,
    },
    /// Print the effective settings as TOML
    Config,
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load_or_default(cli.config.as_deref())?;
    if cli.voiceover {
        settings.voiceover.enabled = true;
    }
    if let Some(fps) = cli.fps {
        settings.display.fps = fps;
    }
    if cli.no_color {
        settings.display.colors = false;
    }
    settings.validate()?;
    Ok(settings)
}

fn logging_config(cli: &Cli, interactive: bool) -> LoggingConfig {
    let config = LoggingConfig::from_verbosity(cli.verbose);
    match (&cli.log_file, interactive) {
        (Some(path), _) => config.with_log_target(LogTarget::File(path.clone())),
        // The widget owns the terminal; stderr would tear the screen.
        (None, true) => config
            .with_level(LogLevel::Off)
            .with_log_target(LogTarget::Discard),
        (None, false) if cli.verbose == 0 => config.with_level(LogLevel::Warn),
        (None, false) => config,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let interactive = matches!(cli.command, None | Some(Commands::Run));
    init_logging(logging_config(&cli, interactive))?;
    let settings = load_settings(&cli)?;

    match &cli.command {
        None | Some(Commands::Run) => tiltbar::ui::run(&settings).await,
        Some(Commands::Simulate {
            drag,
            frames,
            every,
            format,
        }) => {
            let plan = SimulationPlan {
                voiceover: settings.voiceover.enabled,
                drags: drag.clone(),
                frames: *frames,
                every: *every,
            };
            let samples = simulate(&settings, &plan);
            let theme = Theme::detect(settings.display.colors);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_report(&mut out, &samples, (*format).into(), &theme)
        }
        Some(Commands::Config) => {
            print!("{}", settings.to_toml()?);
            Ok(())
        }
    }
}

/// Whether a run ended without an error worth reporting.
fn finished_cleanly(outcome: &Result<()>) -> bool {
    match outcome {
        Ok(()) => true,
        // The reader went away (`| head`); everything it wanted was written.
        Err(TiltbarError::Output(err)) => err.kind() == io::ErrorKind::BrokenPipe,
        Err(_) => false,
    }
}

fn exit_code(outcome: Result<()>) -> ExitCode {
    if finished_cleanly(&outcome) {
        return ExitCode::SUCCESS;
    }
    if let Err(err) = outcome {
        eprintln!("tiltbar: {}", err);
    }
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    exit_code(run(cli).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_logging_ignores_rust_log() {
        std::env::set_var("RUST_LOG", "trace");

        let cli = Cli::parse_from(["tiltbar"]);
        assert_eq!(logging_config(&cli, true).target, LogTarget::Discard);

        let cli = Cli::parse_from(["tiltbar", "run", "-vv"]);
        assert_eq!(logging_config(&cli, true).target, LogTarget::Discard);
    }

    #[test]
    fn test_log_file_wins_in_interactive_mode() {
        let cli = Cli::parse_from(["tiltbar", "--log-file", "tiltbar.log"]);
        let config = logging_config(&cli, true);
        assert_eq!(config.target, LogTarget::File(PathBuf::from("tiltbar.log")));
    }

    #[test]
    fn test_simulate_logs_warnings_to_stderr() {
        let cli = Cli::parse_from(["tiltbar", "simulate"]);
        let config = logging_config(&cli, false);
        assert_eq!(config.target, LogTarget::Stderr);
        assert_eq!(config.level, LogLevel::Warn);
    }

    #[test]
    fn test_broken_pipe_is_success() {
        let broken = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
        assert!(finished_cleanly(&Err(TiltbarError::Output(broken))));

        let full = io::Error::new(io::ErrorKind::Other, "disk full");
        assert!(!finished_cleanly(&Err(TiltbarError::Output(full))));

        let missing = TiltbarError::ConfigNotFound("tiltbar.toml".to_string());
        assert!(!finished_cleanly(&Err(missing)));
    }
}
