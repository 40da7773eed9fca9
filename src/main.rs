// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::Path;

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod database;
mod errors;
mod export_cache;
mod slug;
mod translation_service;

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new translation
    Add {
        /// Unique translation key
        #[arg(short, long)]
        key: String,

        /// Content as a JSON object mapping locale to text, e.g. '{"en":"Welcome"}'
        #[arg(short, long)]
        content: String,

        /// Tag label; may be repeated
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// Update an existing translation's content and/or tags
    Update {
        /// Translation id
        id: i64,

        /// Replacement content as a JSON object mapping locale to text
        #[arg(short, long)]
        content: Option<String>,

        /// Replacement tag label; may be repeated. Omitting all tags leaves the set unchanged
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Detach every tag from the translation
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,
    },

    /// Delete a translation
    Delete {
        /// Translation id
        id: i64,
    },

    /// Show a single translation with its tags
    Show {
        /// Translation id
        id: i64,
    },

    /// List translations with optional filters
    List {
        /// Filter by exact tag slug
        #[arg(long)]
        tag: Option<String>,

        /// Filter by key substring
        #[arg(long)]
        key: Option<String>,

        /// Filter by substring of the "en" content value
        #[arg(long)]
        content: Option<String>,

        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Export the key -> text mapping for a locale
    Export {
        /// Locale code, e.g. 'en', 'fr'
        locale: String,
    },

    /// Show database statistics
    Stats,

    /// Generate shell completions for lingostore
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// lingostore - translation management with per-locale export caching
///
/// Manages localized text strings addressed by a unique key, each carrying
/// content for multiple locales and taggable for categorization. Locale
/// exports are served from a read-through cache invalidated on every write.
#[derive(Parser, Debug)]
#[command(name = "lingostore")]
#[command(version = "0.1.0")]
#[command(about = "Translation management service with a per-locale export cache")]
#[command(long_about = "lingostore manages localized text strings and serves per-locale exports
from a time-bounded, write-invalidated cache.

EXAMPLES:
    lingostore add -k welcome -c '{\"en\":\"Welcome\",\"fr\":\"Bienvenue\"}' -t web
    lingostore update 1 -c '{\"en\":\"Updated\"}'
    lingostore update 1 -t mobile                 # replace the tag set
    lingostore list --tag web --key welcome
    lingostore export fr                          # cached key -> text mapping
    lingostore completions bash > lingostore.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short = 'C', long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Custom logger writing timestamped, level-colored lines to stderr
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    /// Initialize the global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    /// ANSI color code for a log level
    fn color_for_level(level: Level) -> &'static str {
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
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
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

    let cli = CommandLineOptions::parse();

    // Completions need no configuration or database
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "lingostore", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.into());
    }

    // Load or create configuration
    let config_path = &cli.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        config.to_file(config_path)?;
        config
    };

    // Override config with CLI options if provided
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.into());
    }

    let controller = Controller::with_config(config)?;

    let response = match cli.command {
        Commands::Add { key, content, tags } => controller.create(&key, &content, tags).await?,
        Commands::Update {
            id,
            content,
            tags,
            clear_tags,
        } => {
            let tags = if clear_tags {
                Some(Vec::new())
            } else if tags.is_empty() {
                None
            } else {
                Some(tags)
            };
            controller.update(id, content, tags).await?
        }
        Commands::Delete { id } => controller.delete(id).await?,
        Commands::Show { id } => controller.show(id).await?,
        Commands::List {
            tag,
            key,
            content,
            page,
        } => controller.list(tag, key, content, page).await?,
        Commands::Export { locale } => controller.export(&locale).await?,
        Commands::Stats => controller.stats()?,
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    println!("{}", response);

    Ok(())
}
