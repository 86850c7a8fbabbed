// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use dubwai::app_config::{self, Config, TranslationProvider};
use dubwai::app_controller::{prepare_transcript, Controller, RunRequest};
use dubwai::file_utils::FileManager;
use dubwai::language_utils;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Gemini,
    Ollama,
    Anthropic,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Gemini => TranslationProvider::Gemini,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
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
    /// Translate and synthesize a transcript (default command)
    Run(RunArgs),

    /// Build the markup of a transcript without translation or synthesis
    Prepare(PrepareArgs),

    /// Generate shell completions for dubwai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every command that reads a transcript
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Source language tag (e.g. 'ru-RU')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language tag (e.g. 'en-US')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Speaker to voice mapping as a JSON object
    #[arg(long, value_name = "JSON", conflicts_with = "voice_map_file")]
    voice_map: Option<String>,

    /// File containing the speaker to voice mapping
    #[arg(long, value_name = "PATH")]
    voice_map_file: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Transcript file or directory of transcripts
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Audio sample rate in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Audio volume gain in dB
    #[arg(long, allow_hyphen_values = true)]
    volume_gain: Option<f64>,

    /// Directory for uploads, artifacts and audio
    #[arg(long, env = "APP_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Markup size above which the transcript is synthesized in chunks
    #[arg(long, env = "MAX_SSML_CHARS")]
    max_ssml_chars: Option<usize>,

    /// Google API key for Gemini and Text-to-Speech
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct PrepareArgs {
    /// Transcript file
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    #[command(flatten)]
    common: CommonArgs,

    /// Write the markup to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// dubwai - transcript dubbing with AI
///
/// Translates a speaker-labelled transcript and synthesizes it as speech.
#[derive(Parser, Debug)]
#[command(name = "dubwai")]
#[command(version = "0.1.0")]
#[command(about = "AI-powered transcript dubbing tool")]
#[command(long_about = "dubwai translates a transcript of 'Speaker HH:MM:SS' blocks and synthesizes it with Google Text-to-Speech.

EXAMPLES:
    dubwai interview.txt                              # Translate and synthesize using default config
    dubwai -s ru-RU -t en-US interview.txt            # Choose the language pair
    dubwai --voice-map '{\"Anna\":\"en-US-Neural2-F\"}' interview.txt
    dubwai -p ollama -m llama3.2:3b interview.txt     # Translate with a local model
    dubwai --log-level debug transcripts/             # Process an entire directory
    dubwai prepare interview.txt -o interview.ssml    # Inspect the markup offline
    dubwai completions bash > dubwai.bash             # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. GOOGLE_API_KEY fills the Gemini and
    Text-to-Speech keys when they are empty.

SUPPORTED PROVIDERS:
    gemini    - Google Gemini API (default: gemini-2.5-pro)
    ollama    - Local Ollama server (default: llama3.2:3b)
    anthropic - Anthropic Claude API (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger accepts everything; `log::set_max_level` does the filtering
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and symbol for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "✗"),
            Level::Warn => ("\x1B[1;33m", "!"),
            Level::Info => ("\x1B[1;32m", " "),
            Level::Debug => ("\x1B[1;36m", "·"),
            Level::Trace => ("\x1B[1;35m", "…"),
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
            let (color, symbol) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "{}{} {} {}\x1B[0m", color, now, symbol, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "dubwai", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Prepare(args)) => run_prepare(args),
        Some(Commands::Run(args)) => run_dub(args).await,
        None => run_dub(cli.run).await,
    }
}

/// Load the configuration file, creating it with defaults when missing
fn load_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        Ok(config)
    }
}

/// Apply the options shared by all commands and return the run options
fn apply_common_args(config: &mut Config, common: &CommonArgs) -> Result<RunRequest> {
    if let Some(log_level) = &common.log_level {
        config.log_level = log_level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    if let Some(source_lang) = &common.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &common.target_language {
        config.target_language = target_lang.clone();
    }

    let mut request = RunRequest::from_config(config);
    if let Some(json) = &common.voice_map {
        request = request.with_voice_map(json.clone());
    } else if let Some(path) = &common.voice_map_file {
        request = request.with_voice_map(FileManager::read_to_string(path)?);
    }
    Ok(request)
}

async fn run_dub(options: RunArgs) -> Result<()> {
    let input_path = options.input_path.clone()
        .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

    let mut config = load_config(&options.common.config_path)?;

    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }
    if let Some(sample_rate) = options.sample_rate {
        config.synthesis.sample_rate_hz = sample_rate;
    }
    if let Some(volume_gain) = options.volume_gain {
        config.synthesis.volume_gain_db = volume_gain;
    }
    if let Some(data_dir) = &options.data_dir {
        config.storage.data_dir = data_dir.clone();
    }
    if let Some(max_ssml_chars) = options.max_ssml_chars {
        config.storage.max_ssml_chars = max_ssml_chars;
    }
    if let Some(api_key) = &options.api_key {
        config.apply_google_api_key(api_key);
    }

    let request = apply_common_args(&mut config, &options.common)?;

    config.validate()
        .context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;
    controller.check_connection(&request).await?;

    if input_path.is_file() {
        let report = controller.run(&input_path, &request).await?;
        info!("Prepared markup: {}", report.ssml_path.display());
        for path in &report.audio_paths {
            println!("{}", path.display());
        }
    } else if input_path.is_dir() {
        let summary = controller.run_folder(&input_path, &request).await?;
        if summary.failed > 0 {
            error!("{} transcript(s) failed", summary.failed);
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}

fn run_prepare(options: PrepareArgs) -> Result<()> {
    let mut config = load_config(&options.common.config_path)?;
    let request = apply_common_args(&mut config, &options.common)?;
    language_utils::validate_language_tag(&request.source_language)?;

    let content = FileManager::read_bytes(&options.input_path)?;
    let prepared = prepare_transcript(&content, &request)?;

    info!("Detected {} segments.", prepared.segments.len());
    info!("Detected speakers: {}", prepared.speakers.join(", "));
    info!("Speaker counts: {}", prepared.speaker_counts);
    if prepared.intro.is_detected() {
        info!("Intro detected ({} segments). {}", prepared.intro.segment_count, prepared.intro.reason);
    } else {
        info!("No intro detected. {}", prepared.intro.reason);
    }

    match &options.output {
        Some(path) => {
            FileManager::write_to_file(path, &prepared.ssml)?;
            info!("Saved prepared SSML to {}", path.display());
        }
        None => println!("{}", prepared.ssml),
    }

    Ok(())
}
