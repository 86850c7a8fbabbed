use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::{AppError, RunFailure, TranscriptError};
use crate::file_utils::FileManager;
use crate::language_utils::{get_language_name, same_language_tag};
use crate::ssml::{build_ssml, estimate_chunking_need, parse_voice_map, VoiceMap};
use crate::synthesis::{SynthesisRequest, SynthesisService, Synthesizer};
use crate::transcript::{
    detect_intro, extract_speakers, parse_speaker_segments, split_segments_for_chunks,
    summarize_speakers, IntroInfo, Segment,
};
use crate::translation::{TranslationService, Translator};

// @module: Application controller for transcript processing

/// Number of intro characters shown in the run log
const INTRO_PREVIEW_CHARS: usize = 180;

/// Per-run options, defaulted from the configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub source_language: String,
    pub target_language: String,

    /// JSON object mapping speaker labels to voice names
    pub voice_map_json: String,

    pub sample_rate_hz: u32,
    pub volume_gain_db: f64,
}

impl RunRequest {
    pub fn from_config(config: &Config) -> Self {
        Self {
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
            voice_map_json: "{}".to_string(),
            sample_rate_hz: config.synthesis.sample_rate_hz,
            volume_gain_db: config.synthesis.volume_gain_db,
        }
    }

    /// Replace the voice map
    pub fn with_voice_map(mut self, voice_map_json: impl Into<String>) -> Self {
        self.voice_map_json = voice_map_json.into();
        self
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Timestamp prefix shared by every file of the run
    pub run_id: String,
    pub upload_path: PathBuf,
    pub ssml_path: PathBuf,
    pub audio_paths: Vec<PathBuf>,
    pub segment_count: usize,
    pub speakers: Vec<String>,
    pub intro: IntroInfo,
    pub chunked: bool,
    pub logs: Vec<String>,
}

/// Outcome of a folder run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Transcript parsed for offline inspection, without translation or audio
#[derive(Debug, Clone)]
pub struct PreparedTranscript {
    pub segments: Vec<Segment>,
    pub speakers: Vec<String>,
    pub speaker_counts: String,
    pub intro: IntroInfo,
    pub ssml: String,
}

/// Ordered log of the steps of one run
///
/// Every entry is also emitted through the `log` facade at info level.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    entries: Vec<String>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.entries.push(message);
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }

    /// Turn the log into a failure carrying `error`
    pub fn fail(self, error: impl Into<AppError>) -> RunFailure {
        RunFailure {
            error: error.into(),
            logs: self.entries,
        }
    }
}

/// Decode uploaded bytes as UTF-8 text
pub fn decode_transcript(content: &[u8]) -> Result<&str, TranscriptError> {
    std::str::from_utf8(content).map_err(|_| TranscriptError::InvalidEncoding)
}

/// Parse a transcript, rejecting one without any speaker segment
pub fn parse_transcript(text: &str) -> Result<Vec<Segment>, TranscriptError> {
    let segments = parse_speaker_segments(text);
    if segments.is_empty() {
        return Err(TranscriptError::NoSegments);
    }
    Ok(segments)
}

/// Build the untranslated markup of a transcript
///
/// The text is still in the source language, so the markup is tagged with it.
pub fn prepare_transcript(content: &[u8], request: &RunRequest) -> Result<PreparedTranscript, TranscriptError> {
    let text = decode_transcript(content)?;
    let segments = parse_transcript(text)?;
    let voice_map = parse_voice_map(&request.voice_map_json)?;

    Ok(PreparedTranscript {
        speakers: extract_speakers(&segments),
        speaker_counts: summarize_speakers(&segments),
        intro: detect_intro(&segments),
        ssml: build_ssml(&segments, &voice_map, &request.source_language),
        segments,
    })
}

fn file_error(error: anyhow::Error) -> AppError {
    AppError::File(format!("{:#}", error))
}

fn progress_bar(len: usize, unit: &str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template(&format!("{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}}", unit))
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style.progress_chars("█▓▒░"));
    bar
}

/// Main application controller for transcript dubbing
pub struct Controller {
    // @field: App configuration
    config: Config,

    translator: Box<dyn Translator>,

    synthesizer: Box<dyn Synthesizer>,

    show_progress: bool,
}

impl Controller {
    // @method: Create a controller backed by the configured services
    pub fn with_config(config: Config) -> Result<Self> {
        let translator = TranslationService::new(config.translation.clone())?;
        let synthesizer = SynthesisService::new(config.synthesis.clone());
        Ok(Self::with_services(config, Box::new(translator), Box::new(synthesizer)))
    }

    // @method: Create a controller with injected services
    pub fn with_services(config: Config, translator: Box<dyn Translator>, synthesizer: Box<dyn Synthesizer>) -> Self {
        Self {
            config,
            translator,
            synthesizer,
            show_progress: true,
        }
    }

    /// Enable or disable terminal progress bars
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Verify the translation provider answers before any file is processed
    ///
    /// Skipped when the request translates into its own language.
    pub async fn check_connection(&self, request: &RunRequest) -> Result<(), AppError> {
        if same_language_tag(&request.source_language, &request.target_language) {
            debug!("Source and target languages match, skipping connection check");
            return Ok(());
        }

        self.translator.test_connection().await?;
        info!("Translation provider {} is reachable", self.config.translation.provider.display_name());
        Ok(())
    }

    /// Process one transcript file end to end
    pub async fn run(&self, input_file: &Path, request: &RunRequest) -> Result<RunReport, RunFailure> {
        let start_time = Instant::now();
        let mut log = RunLog::new();

        match self.execute(input_file, request, &mut log).await {
            Ok(mut report) => {
                debug!("Run {} finished in {}", report.run_id, Self::format_duration(start_time.elapsed()));
                report.logs = log.into_entries();
                Ok(report)
            }
            Err(e) => {
                error!("Processing failed: {}", e);
                Err(log.fail(e))
            }
        }
    }

    /// Process every `.txt` transcript under a directory
    ///
    /// A failing file is logged and counted; the remaining files still run.
    pub async fn run_folder(&self, input_dir: &Path, request: &RunRequest) -> Result<FolderSummary, AppError> {
        if !FileManager::dir_exists(input_dir) {
            return Err(AppError::File(format!("Input directory does not exist: {:?}", input_dir)));
        }

        let files = FileManager::find_files(input_dir, "txt").map_err(file_error)?;
        if files.is_empty() {
            return Err(AppError::File(format!("No transcript files found in directory: {:?}", input_dir)));
        }

        let start_time = Instant::now();
        let folder_pb = progress_bar(files.len(), "files", self.show_progress);
        let mut summary = FolderSummary::default();

        for file in &files {
            let file_name = file.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            match self.run(file, request).await {
                Ok(report) => {
                    info!("{}: {} audio file(s) written", file_name, report.audio_paths.len());
                    summary.processed += 1;
                }
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    summary.failed += 1;
                }
            }
            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");
        info!("Folder processing completed: {} processed, {} errors in {}",
              summary.processed, summary.failed, Self::format_duration(start_time.elapsed()));

        Ok(summary)
    }

    async fn execute(&self, input_file: &Path, request: &RunRequest, log: &mut RunLog) -> Result<RunReport, AppError> {
        let storage = &self.config.storage;
        for dir in [storage.upload_dir(), storage.artifact_dir(), storage.audio_dir()] {
            FileManager::ensure_dir(&dir).map_err(file_error)?;
        }

        let run_id = self.next_run_id();
        let file_name = input_file.file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| "transcript.txt".to_string());

        log.push("Reading upload...");
        let content = FileManager::read_bytes(input_file).map_err(file_error)?;
        let upload_path = FileManager::timestamped_path(storage.upload_dir(), &run_id, &file_name);
        FileManager::write_bytes(&upload_path, &content).map_err(file_error)?;
        log.push(format!("Saved upload to {}", upload_path.display()));

        let text = decode_transcript(&content)?;

        log.push("Parsing speaker segments...");
        let segments = parse_transcript(text)?;
        log.push(format!("Detected {} segments.", segments.len()));

        let speakers = extract_speakers(&segments);
        log.push(format!("Detected speakers: {}", speakers.join(", ")));
        log.push(format!("Speaker counts: {}", summarize_speakers(&segments)));

        let intro = detect_intro(&segments);
        if intro.is_detected() {
            log.push(format!("Intro detected ({} segments). {}", intro.segment_count, intro.reason));
            log.push(format!("Intro preview: {}...", intro.preview(INTRO_PREVIEW_CHARS)));
        } else {
            log.push(format!("No intro detected. {}", intro.reason));
        }

        let voice_map = parse_voice_map(&request.voice_map_json)?;

        let translated = self.translate_segments(&segments, request, log).await?;

        log.push("Building SSML...");
        let ssml = build_ssml(&translated, &voice_map, &request.target_language);
        let ssml_path = FileManager::timestamped_path(storage.artifact_dir(), &run_id, "prepared.ssml.txt");
        FileManager::write_to_file(&ssml_path, &ssml).map_err(file_error)?;
        log.push(format!("Saved prepared SSML to {}", ssml_path.display()));

        let chunked = estimate_chunking_need(&ssml, storage.max_ssml_chars);
        let audio_paths = if chunked {
            self.synthesize_chunks(&translated, &voice_map, &run_id, request, log).await?
        } else {
            log.push("Synthesizing audio...");
            let audio = self.synthesizer.synthesize(&self.synthesis_request(ssml, request)).await?;
            let audio_path = storage.audio_dir()
                .join(format!("{}.{}", run_id, self.config.synthesis.audio_extension()));
            FileManager::write_bytes(&audio_path, &audio).map_err(file_error)?;
            log.push("Generated single audio file.");
            vec![audio_path]
        };

        Ok(RunReport {
            run_id,
            upload_path,
            ssml_path,
            audio_paths,
            segment_count: segments.len(),
            speakers,
            intro,
            chunked,
            logs: Vec::new(),
        })
    }

    /// Translate every segment in order; the first failure aborts
    async fn translate_segments(&self, segments: &[Segment], request: &RunRequest, log: &mut RunLog) -> Result<Vec<Segment>, AppError> {
        let total = segments.len();
        let language_name = |tag: &str| get_language_name(tag).unwrap_or_else(|_| tag.to_string());
        debug!("Translating from {} to {}",
               language_name(&request.source_language), language_name(&request.target_language));

        let pb = progress_bar(total, "segments", self.show_progress);
        let mut translated = Vec::with_capacity(total);

        for (index, segment) in segments.iter().enumerate() {
            log.push(format!("Translating segment {}/{} ({})", index + 1, total, segment.speaker));
            let text = match self.translator
                .translate(&segment.text, &request.source_language, &request.target_language)
                .await
            {
                Ok(text) => text,
                Err(e) => {
                    pb.abandon();
                    return Err(e.into());
                }
            };
            translated.push(segment.with_text(text));
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(translated)
    }

    async fn synthesize_chunks(
        &self,
        segments: &[Segment],
        voice_map: &VoiceMap,
        run_id: &str,
        request: &RunRequest,
        log: &mut RunLog,
    ) -> Result<Vec<PathBuf>, AppError> {
        let storage = &self.config.storage;
        log.push("Input exceeds SSML limit, chunking enabled.");

        let chunks = split_segments_for_chunks(segments, storage.max_ssml_chars);
        let total = chunks.len();
        log.push(format!("Preparing {} audio chunks...", total));

        let pb = progress_bar(total, "chunks", self.show_progress);
        let mut audio_paths = Vec::with_capacity(total);

        for (index, chunk) in chunks.iter().enumerate() {
            log.push(format!("Synthesizing chunk {}/{}", index + 1, total));
            let chunk_ssml = build_ssml(chunk, voice_map, &request.target_language);
            if chunk_ssml.chars().count() > storage.max_ssml_chars {
                warn!("Chunk {} markup is {} characters, above the {} limit",
                      index + 1, chunk_ssml.chars().count(), storage.max_ssml_chars);
            }

            let audio = match self.synthesizer.synthesize(&self.synthesis_request(chunk_ssml, request)).await {
                Ok(audio) => audio,
                Err(e) => {
                    pb.abandon();
                    return Err(e.into());
                }
            };

            let part_path = storage.audio_dir().join(format!(
                "{}_part_{}.{}", run_id, index + 1, self.config.synthesis.audio_extension()
            ));
            FileManager::write_bytes(&part_path, &audio).map_err(file_error)?;
            audio_paths.push(part_path);
            pb.inc(1);
        }

        pb.finish_and_clear();
        log.push(format!("Generated {} audio chunks.", audio_paths.len()));
        Ok(audio_paths)
    }

    fn synthesis_request(&self, ssml: String, request: &RunRequest) -> SynthesisRequest {
        SynthesisRequest {
            ssml,
            voice_name: None,
            language_code: request.target_language.clone(),
            sample_rate_hz: request.sample_rate_hz,
            volume_gain_db: request.volume_gain_db,
        }
    }

    /// Timestamp not yet used by an earlier run in the same data directory
    fn next_run_id(&self) -> String {
        let timestamp = FileManager::run_timestamp();
        let artifact_dir = self.config.storage.artifact_dir();
        let taken = |id: &str| {
            FileManager::file_exists(FileManager::timestamped_path(&artifact_dir, id, "prepared.ssml.txt"))
        };

        if !taken(&timestamp) {
            return timestamp;
        }

        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", timestamp, n);
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Format a duration as a human-readable string
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
