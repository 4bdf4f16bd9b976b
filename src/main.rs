// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

use hanzi_annotator::app_config::{self, Config, LexiconProviderKind};
use hanzi_annotator::{AnnotatedDocument, AnnotationEngine};

/// CLI Wrapper for LexiconProviderKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLexiconProvider {
    Table,
    Mock,
    Ollama,
}

impl From<CliLexiconProvider> for LexiconProviderKind {
    fn from(cli_provider: CliLexiconProvider) -> Self {
        match cli_provider {
            CliLexiconProvider::Table => LexiconProviderKind::Table,
            CliLexiconProvider::Mock => LexiconProviderKind::Mock,
            CliLexiconProvider::Ollama => LexiconProviderKind::Ollama,
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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Annotate a text file (or stdin) and print the result as JSON
    Annotate(AnnotateArgs),

    /// Generate shell completions for hanzi-annotator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct AnnotateArgs {
    /// Input text file, or '-' for stdin
    #[arg(value_name = "INPUT", default_value = "-")]
    input: String,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Lexicon provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliLexiconProvider>,

    /// Dictionary file for the table provider
    #[arg(short, long)]
    dictionary: Option<PathBuf>,

    /// Idiom catalog file (one idiom per line)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Write the JSON result to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,

    /// Log summary statistics after annotating
    #[arg(long)]
    stats: bool,

    /// Disable the per-call lookup cache
    #[arg(long)]
    no_cache: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// hanzi-annotator - pinyin, glosses and chengyu for Chinese text
#[derive(Parser, Debug)]
#[command(name = "hanzi-annotator")]
#[command(version)]
#[command(about = "Annotate Chinese text with pinyin, glosses and idiom groups")]
#[command(long_about = "hanzi-annotator splits Chinese text into paragraphs, detects chengyu and \
attaches pinyin and a gloss to every character.

EXAMPLES:
    hanzi-annotator annotate story.txt                 # Annotate using conf.json
    cat story.txt | hanzi-annotator annotate -         # Read from stdin
    hanzi-annotator annotate -p ollama story.txt       # Ask a local Ollama model
    hanzi-annotator annotate --pretty -o out.json a.txt
    hanzi-annotator completions bash > hanzi-annotator.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
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
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
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
    // The level is lowered or raised once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "hanzi-annotator", &mut std::io::stdout());
            Ok(())
        }
        Commands::Annotate(args) => run_annotate(args).await,
    }
}

/// Load the config file, creating a default one when it is missing
fn load_config(config_path: &str) -> Result<Config> {
    let path = Path::new(config_path);
    if path.exists() {
        return Config::from_file(path);
    }

    warn!("Config file not found at '{}', creating default config.", config_path);
    let config = Config::default();
    config.save(path)?;
    Ok(config)
}

/// Apply command line overrides on top of the loaded config
fn apply_overrides(config: &mut Config, args: &AnnotateArgs) {
    if let Some(provider) = &args.provider {
        config.lexicon.provider = provider.clone().into();
    }
    if let Some(dictionary) = &args.dictionary {
        config.lexicon.dictionary_path = Some(dictionary.to_string_lossy().into_owned());
    }
    if let Some(catalog) = &args.catalog {
        config.catalog.path = Some(catalog.to_string_lossy().into_owned());
    }
    if args.no_cache {
        config.engine.cache_lookups = false;
    }
    if let Some(log_level) = &args.log_level {
        config.log_level = log_level.clone().into();
    }
}

async fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read stdin")?;
        return Ok(text);
    }

    tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read input file: {}", input))
}

fn render(document: &AnnotatedDocument, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(document)
    } else {
        serde_json::to_string(document)
    };
    json.context("Failed to serialize annotated document")
}

async fn run_annotate(args: AnnotateArgs) -> Result<()> {
    if let Some(level) = &args.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = load_config(&args.config_path)?;
    apply_overrides(&mut config, &args);
    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    let engine = AnnotationEngine::from_config(&config)?;
    if config.lexicon.provider == LexiconProviderKind::Ollama {
        engine
            .check_provider()
            .await
            .context("Lexicon provider is not reachable")?;
    }
    let text = read_input(&args.input).await?;

    let cancel = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No signal handler: never cancel
            std::future::pending::<()>().await;
        }
    };

    let document = engine
        .annotate_with_cancel(&text, cancel)
        .await?;

    if args.stats {
        let stats = document.stats();
        info!(
            "{} paragraph(s), {} token(s), {} idiom(s), {} fallback token(s)",
            stats.paragraphs, stats.tokens, stats.idioms, stats.fallbacks
        );
    }

    let json = render(&document, args.pretty)?;
    match &args.output {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!("Success: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
