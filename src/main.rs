// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use crate::app_config::{Config, TranslationProvider};
use crate::bilingual_merger::BilingualMerger;
use crate::book_translator::BookTranslator;
use crate::document_formatter::DocumentFormatter;

mod app_config;
mod bilingual_merger;
mod book_translator;
mod document_formatter;
mod errors;
mod file_utils;
mod providers;
mod segmenter;
mod token_counter;
mod translation_client;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    OpenAI,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
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

fn level_filter_for(level: &app_config::LogLevel) -> LevelFilter {
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
    /// Convert a spreadsheet export to a page-annotated text document
    Convert(ConvertArgs),

    /// Translate a page-annotated book with the configured AI provider
    Translate(TranslateArgs),

    /// Merge the Arabic source and English translation into one bilingual file
    Merge(MergeArgs),

    /// Generate shell completions for kitabai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input spreadsheet file
    #[arg(short, long, default_value = "my kafiah-1.xlsx")]
    input: PathBuf,

    /// Output text file
    #[arg(short, long, default_value = "kafiah.txt")]
    output: PathBuf,

    /// Worksheet index to process (0 = first sheet)
    #[arg(long, default_value_t = 0)]
    sheet: usize,

    /// Document title written into the header block
    #[arg(long, default_value = "كفية المتحفظ ونهاية المتلفظ")]
    title: String,
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input page-annotated text file
    #[arg(short, long, default_value = "kafiah.txt")]
    input: PathBuf,

    /// Output translated text file
    #[arg(short, long, default_value = "kafiah_english.txt")]
    output: PathBuf,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the provider (resolved here, never inside components)
    #[arg(short, long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct MergeArgs {
    /// Arabic source text file
    #[arg(long, default_value = "kafiah.txt")]
    arabic: PathBuf,

    /// English translation text file
    #[arg(long, default_value = "kafiah_english.txt")]
    english: PathBuf,

    /// Output bilingual text file
    #[arg(short, long, default_value = "kafiah_merged.txt")]
    output: PathBuf,
}

/// Kitabai - Arabic book translation with AI
///
/// Converts spreadsheet book exports into page-annotated text, translates
/// them in token-bounded chunks through an AI provider, and merges the
/// source and translation into a bilingual document.
#[derive(Parser, Debug)]
#[command(name = "kitabai")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered Arabic book translation pipeline")]
#[command(long_about = "Kitabai converts spreadsheet book exports into page-annotated text,
translates them chunk by chunk using an AI provider, and merges the Arabic
source with the English translation.

EXAMPLES:
    kitabai convert                              # Spreadsheet to kafiah.txt
    kitabai translate                            # Translate with default config
    kitabai translate -p ollama -m llama2        # Use a local Ollama model
    kitabai merge                                # Build the bilingual file
    kitabai completions bash > kitabai.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically.

SUPPORTED PROVIDERS:
    openai    - OpenAI-compatible API (requires API key)
    ollama    - Local Ollama server (default: llama2)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
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
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
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

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Convert(args) => run_convert(args),
        Commands::Translate(args) => run_translate(args).await,
        Commands::Merge(args) => run_merge(args),
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "kitabai", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let formatter = DocumentFormatter::new(args.title).with_sheet(args.sheet);
    formatter.convert(&args.input, &args.output)
        .map_err(|e| anyhow!("Failed to convert spreadsheet: {}", e))
}

fn run_merge(args: MergeArgs) -> Result<()> {
    BilingualMerger::merge_files(&args.arabic, &args.english, &args.output)
        .map_err(|e| anyhow!("Failed to merge translations: {}", e))
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter_for(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        // Load existing configuration
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

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = &options.model {
        config.translation.set_model(model);
    }

    // Credential resolution happens here, at the process entry point;
    // components only ever see the value carried in the config
    if let Some(api_key) = &options.api_key {
        config.translation.set_api_key(api_key);
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter_for(&config.log_level));
    }

    let translator = BookTranslator::new(config)
        .map_err(|e| anyhow!("Failed to initialize translator: {}", e))?;

    // A failed probe is only a warning; the per-chunk loop will surface
    // real errors and skip past them
    if let Err(e) = translator.test_connection().await {
        warn!("Provider connection test failed: {}", e);
    }

    translator.translate_book(&options.input, &options.output)
        .await
        .map_err(|e| anyhow!("Book translation failed: {}", e))
}
