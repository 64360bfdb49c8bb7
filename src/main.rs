// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result, Context};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, SubtitleMode};
use app_controller::Controller;
use store::Repository;

mod app_config;
mod app_controller;
mod errors;
mod playlist;
mod reflow;
mod resolver;
mod segmenter;
mod session;
mod store;
mod subtitle_processor;
mod sync_poller;

/// CLI Wrapper for SubtitleMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSubtitleMode {
    Off,
    Primary,
    Secondary,
    Both,
}

impl From<CliSubtitleMode> for SubtitleMode {
    fn from(cli_mode: CliSubtitleMode) -> Self {
        match cli_mode {
            CliSubtitleMode::Off => SubtitleMode::Off,
            CliSubtitleMode::Primary => SubtitleMode::Primary,
            CliSubtitleMode::Secondary => SubtitleMode::Secondary,
            CliSubtitleMode::Both => SubtitleMode::Both,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a video's subtitles against a simulated clock (default command)
    Play(PlayArgs),

    /// Parse and print the processed subtitle tracks without playing
    Dump(DumpArgs),

    /// List the records of a playlist catalog
    Playlist(PlaylistArgs),

    /// Generate shell completions for subsync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Video URL or bare 11-character video id
    #[arg(value_name = "VIDEO")]
    video: Option<String>,

    /// Primary subtitle file (.srt)
    #[arg(short, long)]
    primary: Option<PathBuf>,

    /// Secondary subtitle file (.srt) for bilingual display
    #[arg(short, long)]
    secondary: Option<PathBuf>,

    /// Playlist catalog (path or URL) to play from instead of files
    #[arg(long, conflicts_with_all = ["video", "primary", "secondary"])]
    playlist: Option<String>,

    /// Record index within the playlist
    #[arg(long, default_value_t = 0, requires = "playlist")]
    index: usize,

    /// Subtitle visibility mode
    #[arg(short, long, value_enum)]
    mode: Option<CliSubtitleMode>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct DumpArgs {
    /// Primary subtitle file (.srt)
    #[arg(value_name = "PRIMARY")]
    primary: PathBuf,

    /// Secondary subtitle file (.srt); when present the tracks are aligned
    #[arg(short, long)]
    secondary: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct PlaylistArgs {
    /// Playlist catalog path or URL
    #[arg(value_name = "LOCATION")]
    location: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subsync - Bilingual Subtitle Sync Player
///
/// Synchronizes one or two subtitle tracks with a playback clock and
/// renders the active bilingual pair, resuming from saved progress.
#[derive(Parser, Debug)]
#[command(name = "subsync")]
#[command(version = "1.0.0")]
#[command(about = "Bilingual subtitle synchronization")]
#[command(long_about = "subsync parses SRT subtitle tracks, reflows long lines into \
display-sized slots, aligns a second language onto the same timeline, and plays the \
result against a clock.

EXAMPLES:
    subsync dQw4w9WgXcQ -p movie.en.srt              # Single-track playback
    subsync dQw4w9WgXcQ -p en.srt -s zh.srt          # Bilingual playback
    subsync play --playlist playlist.json --index 2  # Play a catalog record
    subsync dump en.srt -s zh.srt                    # Print the aligned tracks
    subsync playlist ./playlist.json                 # List catalog records
    subsync completions bash > subsync.bash          # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically. Display preferences saved by an attached
    UI override the config file values.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Video URL or bare 11-character video id
    #[arg(value_name = "VIDEO")]
    video: Option<String>,

    /// Primary subtitle file (.srt)
    #[arg(short, long)]
    primary: Option<PathBuf>,

    /// Secondary subtitle file (.srt) for bilingual display
    #[arg(short, long)]
    secondary: Option<PathBuf>,

    /// Subtitle visibility mode
    #[arg(short, long, value_enum)]
    mode: Option<CliSubtitleMode>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subsync", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Play(args)) => run_play(args).await,
        Some(Commands::Dump(args)) => run_dump(args).await,
        Some(Commands::Playlist(args)) => run_playlist(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let play_args = PlayArgs {
                video: cli.video,
                primary: cli.primary,
                secondary: cli.secondary,
                playlist: None,
                index: 0,
                mode: cli.mode,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_play(play_args).await
        }
    }
}

async fn run_play(options: PlayArgs) -> Result<()> {
    let config = load_config(
        &options.config_path,
        options.log_level.as_ref(),
        options.mode.as_ref(),
    )?;

    let repository = Repository::new_default()?;
    let controller = Controller::with_config(config, repository)?;

    if let Some(playlist) = &options.playlist {
        return controller.play_playlist_item(playlist, options.index).await;
    }

    let video = options
        .video
        .ok_or_else(|| anyhow!("VIDEO is required unless --playlist is given"))?;
    let primary = options
        .primary
        .ok_or_else(|| anyhow!("--primary subtitle file is required"))?;

    controller
        .play_files(&video, &primary, options.secondary.as_deref())
        .await
}

async fn run_dump(options: DumpArgs) -> Result<()> {
    apply_log_level(options.log_level.as_ref());

    // Dump never touches the on-disk store
    let repository = Repository::new_in_memory()?;
    let controller = Controller::with_config(Config::default(), repository)?;

    controller.dump(&options.primary, options.secondary.as_deref())
}

async fn run_playlist(options: PlaylistArgs) -> Result<()> {
    apply_log_level(options.log_level.as_ref());

    let repository = Repository::new_in_memory()?;
    let controller = Controller::with_config(Config::default(), repository)?;

    controller.list_playlist(&options.location).await
}

fn apply_log_level(cli_level: Option<&CliLogLevel>) {
    if let Some(level) = cli_level {
        let config_level: app_config::LogLevel = level.clone().into();
        log::set_max_level(to_level_filter(&config_level));
    }
}

/// Load the configuration file, creating a default one when absent, and
/// apply command-line overrides on top
fn load_config(
    config_path: &str,
    log_level: Option<&CliLogLevel>,
    mode: Option<&CliSubtitleMode>,
) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;
        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(mode) = mode {
        config.preferences.subtitle_mode = mode.clone().into();
    }
    if let Some(log_level) = log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    log::set_max_level(to_level_filter(&config.log_level));
    info!("Loaded configuration from '{}'", config_path);

    Ok(config)
}
