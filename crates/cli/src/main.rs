use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use liveness_core::challenge::domain::challenge_config::ChallengeConfig;
use liveness_core::challenge::domain::challenge_layout::ChallengeLayout;
use liveness_core::challenge::domain::draw_instructions::DrawInstructions;
use liveness_core::challenge::domain::state_manager::StateManager;
use liveness_core::detection::infrastructure::detection_recording::DetectionRecording;
use liveness_core::pipeline::challenge_presenter::ChallengePresenter;
use liveness_core::pipeline::frame_capturer::FrameCapturer;
use liveness_core::pipeline::infrastructure::manifest_frame_capturer::ManifestFrameCapturer;
use liveness_core::pipeline::run_challenge_use_case::{ChallengeStatus, RunChallengeUseCase};

const EXIT_CHALLENGE_NOT_PASSED: i32 = 2;

/// Replays recorded face detections through a liveness challenge.
#[derive(Parser)]
#[command(name = "liveness")]
struct Cli {
    /// Detection recording (JSON) to replay.
    #[arg(required_unless_present = "print_config")]
    recording: Option<PathBuf>,

    /// Challenge configuration file (JSON). Defaults to the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame width used to generate the target areas.
    #[arg(long, requires = "image_height")]
    image_width: Option<u32>,

    /// Frame height used to generate the target areas.
    #[arg(long, requires = "image_width")]
    image_height: Option<u32>,

    /// Seed for target area generation (random when omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum frames processed per second (unpaced when omitted).
    #[arg(long)]
    max_fps: Option<u32>,

    /// Append captured frame entries to this JSON Lines file.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,
}

#[derive(Serialize)]
struct Summary {
    status: ChallengeStatus,
    frames_processed: usize,
    frames_captured: usize,
}

fn main() {
    env_logger::init();

    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_CHALLENGE_NOT_PASSED),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = build_config(&cli)?;
    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(true);
    }

    let recording_path = cli
        .recording
        .as_deref()
        .ok_or("A recording file is required")?;
    let recording = DetectionRecording::load(recording_path)?;
    log::info!(
        "Loaded {} frames ({}x{}) from {}",
        recording.frames.len(),
        recording.image_width,
        recording.image_height,
        recording_path.display()
    );

    let capturer: Box<dyn FrameCapturer> = match &cli.manifest {
        Some(path) => Box::new(ManifestFrameCapturer::create(path)?),
        None => Box::new(ManifestFrameCapturer::in_memory()),
    };
    let presenter = Box::new(LogPresenter::new(config.clone()));
    let manager = StateManager::new(config)?;
    let (source, detector) = recording.into_parts();

    let mut use_case = RunChallengeUseCase::new(
        Box::new(source),
        Box::new(detector),
        capturer,
        presenter,
        manager,
    );
    if let Some(fps) = cli.max_fps {
        use_case = use_case.with_max_fps(fps);
    }
    let outcome = use_case.execute()?;

    let summary = Summary {
        status: outcome.status,
        frames_processed: outcome.frames_processed,
        frames_captured: outcome.frames_captured,
    };
    println!("{}", serde_json::to_string(&summary)?);
    if let Some(path) = &cli.manifest {
        log::info!("Capture manifest written to {}", path.display());
    }
    Ok(outcome.status == ChallengeStatus::Passed)
}

fn build_config(cli: &Cli) -> Result<ChallengeConfig, Box<dyn std::error::Error>> {
    let mut config = match cli.config.clone().or_else(default_config_path) {
        Some(path) if path.exists() => load_config(&path)?,
        Some(path) if cli.config.is_some() => {
            return Err(format!("Config file not found: {}", path.display()).into());
        }
        _ => ChallengeConfig::default(),
    };

    if let (Some(width), Some(height)) = (cli.image_width, cli.image_height) {
        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let layout = ChallengeLayout::generate(width, height, &mut rng);
        log::info!(
            "Generated layout for {width}x{height}: face area {:?}, nose area {:?}",
            layout.face_area,
            layout.nose_area
        );
        config = config.with_layout(&layout);
    }

    config.validate()?;
    Ok(config)
}

fn load_config(path: &Path) -> Result<ChallengeConfig, Box<dyn std::error::Error>> {
    log::info!("Loading challenge config from {}", path.display());
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("LivenessChallenge").join("config.json"))
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &cli.recording {
        if !path.exists() {
            return Err(format!("Recording file not found: {}", path.display()).into());
        }
    }
    if cli.max_fps == Some(0) {
        return Err("Max FPS must be greater than 0".into());
    }
    if cli.image_width == Some(0) || cli.image_height == Some(0) {
        return Err("Image dimensions must be greater than 0".into());
    }
    if cli.seed.is_some() && cli.image_width.is_none() {
        return Err("--seed only applies together with --image-width/--image-height".into());
    }
    Ok(())
}

/// Describes what a renderer would draw and show, through the log.
struct LogPresenter {
    config: ChallengeConfig,
}

impl LogPresenter {
    fn new(config: ChallengeConfig) -> Self {
        Self { config }
    }
}

impl ChallengePresenter for LogPresenter {
    fn draw(&mut self, instructions: &DrawInstructions) {
        if let Some(color) = instructions.face_area {
            log::debug!("draw face area {:?} in {color}", self.config.face_area);
        }
        if let Some(color) = instructions.nose_area {
            log::debug!("draw nose area {:?} in {color}", self.config.nose_area);
        }
    }

    fn help_message_changed(&mut self, message: Option<&str>) {
        match message {
            Some(text) => log::info!("Help: {text}"),
            None => log::info!("Help cleared"),
        }
    }

    fn help_animation_changed(&mut self, animation: Option<u32>) {
        match animation {
            Some(id) => log::info!("Help animation: {id}"),
            None => log::info!("Help animation cleared"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("liveness").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_image_dimensions_must_come_together() {
        let result = Cli::try_parse_from(["liveness", "rec.json", "--image-width", "640"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_recording_optional_with_print_config() {
        let cli = parse(&["--print-config"]);
        assert!(cli.recording.is_none());
        assert!(Cli::try_parse_from(["liveness"]).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_fps() {
        let cli = parse(&["--print-config", "--max-fps", "0"]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_validate_rejects_seed_without_dimensions() {
        let cli = parse(&["--print-config", "--seed", "3"]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_build_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"landmark_index": 2, "area_duration_secs": null}"#)
            .unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let cli = parse(&["--print-config", "--config", &path]);

        let config = build_config(&cli).unwrap();

        assert_eq!(config.landmark_index, 2);
        assert_eq!(config.area_duration_secs, None);
    }

    #[test]
    fn test_build_config_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let cli = parse(&["--print-config", "--config", path.to_str().unwrap()]);
        assert!(build_config(&cli).is_err());
    }

    #[test]
    fn test_build_config_generates_seeded_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{}").unwrap();
        let args = [
            "--print-config",
            "--config",
            path.to_str().unwrap(),
            "--image-width",
            "640",
            "--image-height",
            "480",
            "--seed",
            "9",
        ];

        let a = build_config(&parse(&args)).unwrap();
        let b = build_config(&parse(&args)).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.face_area.width, 270.0);
    }
}
