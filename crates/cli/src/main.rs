mod render;

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use engagecam_core::detection::domain::face_detector::FaceDetector;
use engagecam_core::detection::infrastructure::onnx_yolo_detector::{
    OnnxYoloDetector, DEFAULT_CONFIDENCE,
};
use engagecam_core::feedback::domain::feedback_report::AnalysisOutcome;
use engagecam_core::pipeline::pipeline_logger::LoggingPipelineLogger;
use engagecam_core::shared::constants::{VIDEO_EXTENSIONS, YOLO_MODEL_NAME, YOLO_MODEL_URL};
use engagecam_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use engagecam_core::{AnalysisError, AnalyzeVideoUseCase};

/// Facial engagement feedback for recorded interview videos.
#[derive(Parser)]
#[command(name = "engagecam")]
struct Cli {
    /// Input video file.
    input: PathBuf,

    /// Use this ONNX model instead of the cached or downloaded one.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();

    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Returns whether the analysis produced a report.
fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    if !has_video_extension(&cli.input) {
        log::warn!(
            "{} does not look like a video file (expected one of: {})",
            cli.input.display(),
            VIDEO_EXTENSIONS.join(", ")
        );
    }

    let outcome = if cli.input.exists() {
        let detector = build_detector(&cli)?;
        let mut use_case = AnalyzeVideoUseCase::new(
            Box::new(FfmpegReader::new()),
            detector,
            Box::new(LoggingPipelineLogger::new()),
        );
        use_case.execute(&cli.input)
    } else {
        // Skip model resolution and downloads for a path that can't be analyzed.
        AnalysisError::FileNotFound(cli.input.clone()).into()
    };

    print_outcome(&outcome, cli.json)?;
    Ok(!outcome.is_error())
}

fn build_detector(cli: &Cli) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    match &cli.model {
        Some(path) => log::info!("Using model: {}", path.display()),
        None => log::info!("Resolving model: {YOLO_MODEL_NAME}"),
    }
    let detector = OnnxYoloDetector::resolve(
        cli.model.as_deref(),
        YOLO_MODEL_NAME,
        YOLO_MODEL_URL,
        cli.confidence,
        Some(Box::new(download_progress)),
    )?;
    Ok(Box::new(detector))
}

fn print_outcome(outcome: &AnalysisOutcome, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        match outcome {
            AnalysisOutcome::Report(report) => print!("{}", render::report(report)),
            AnalysisOutcome::Error(e) => eprintln!("Error: {}", e.error),
        }
    }
    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if let Some(model) = &cli.model {
        if !model.is_file() {
            return Err(format!("Model file not found: {}", model.display()).into());
        }
    }
    Ok(())
}

fn has_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("interview.mp4", true)]
    #[case("interview.MOV", true)]
    #[case("clip.mkv", true)]
    #[case("old.wmv", true)]
    #[case("old.avi", true)]
    #[case("notes.txt", false)]
    #[case("no_extension", false)]
    fn test_video_extension(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(has_video_extension(Path::new(name)), expected);
    }

    #[test]
    fn test_default_confidence() {
        let cli = Cli::parse_from(["engagecam", "talk.mp4"]);
        assert_eq!(cli.confidence, 0.5);
        assert!(!cli.json);
        assert!(cli.model.is_none());
        assert!(validate(&cli).is_ok());
    }

    #[test]
    fn test_confidence_out_of_range_is_rejected() {
        let cli = Cli::parse_from(["engagecam", "talk.mp4", "--confidence", "1.5"]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_missing_model_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("absent.onnx");
        let cli = Cli::parse_from([
            "engagecam",
            "talk.mp4",
            "--model",
            model.to_str().unwrap(),
        ]);
        let err = validate(&cli).unwrap_err();
        assert!(err.to_string().starts_with("Model file not found"));
    }

    #[test]
    fn test_json_flag() {
        let cli = Cli::parse_from(["engagecam", "--json", "talk.mp4"]);
        assert!(cli.json);
        assert_eq!(cli.input, PathBuf::from("talk.mp4"));
    }
}
