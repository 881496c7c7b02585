//! fit-advisor command line tool
//!
//! Usage:
//! ```bash
//! # Measure a body from recorded landmarks, calibrated to a known height
//! fit-advisor measure photo.landmarks.json --height 178
//!
//! # Recommend a size from manual measurements
//! fit-advisor recommend tee.yaml --height 178 --chest 95 --waist 80 --shoulder 45 --fit slim
//! ```
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fit_advisor::adapters::pose::LandmarkDocument;
use fit_advisor::adapters::{FileLandmarkProvider, FileSizeChartSource};
use fit_advisor::application::{
    MeasureFromPhotoCommand, MeasureFromPhotoError, MeasureFromPhotoHandler, MeasurementSettings,
    PoseSession, RecommendSizeCommand, RecommendSizeHandler, RecommendationSettings,
    SubjectSequencers,
};
use fit_advisor::config::{AppConfig, ConfigError, LoggingConfig};
use fit_advisor::domain::fit::FitPreference;
use fit_advisor::domain::foundation::{ClothingItemId, DomainError, ErrorCode, UserId};
use fit_advisor::domain::measurement::{BodyMeasurementProfile, MeasurementExtractor};
use fit_advisor::ports::{DetectionError, ImageInput};

#[derive(Parser)]
#[command(
    name = "fit-advisor",
    about = "Body measurement and garment size recommendation",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Measure a body from a recorded landmark document
    Measure {
        /// Landmark document (JSON)
        landmarks: PathBuf,

        /// Subject height in centimeters, used for calibration
        #[arg(long)]
        height: Option<f64>,
    },

    /// Recommend a size from body measurements and a size chart
    Recommend {
        /// Size chart document (JSON or YAML)
        chart: String,

        #[arg(long)]
        height: f64,

        #[arg(long)]
        chest: f64,

        #[arg(long)]
        waist: f64,

        #[arg(long)]
        shoulder: f64,

        /// Body measurements are in inches
        #[arg(long)]
        inches: bool,

        /// Fit preference: slim, regular or relaxed
        #[arg(long)]
        fit: Option<FitPreference>,

        #[arg(long, default_value = "local")]
        user: String,

        #[arg(long, default_value = "garment")]
        item: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.logging);

    match run(cli.command, &config).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(code = %err.code, details = ?err.details, "{}", err.message);
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn load_config() -> Result<AppConfig, ConfigError> {
    let config = AppConfig::load()?;
    config.validate()?;
    Ok(config)
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(command: Command, config: &AppConfig) -> Result<String, DomainError> {
    match command {
        Command::Measure { landmarks, height } => measure(landmarks, height, config).await,
        Command::Recommend {
            chart,
            height,
            chest,
            waist,
            shoulder,
            inches,
            fit,
            user,
            item,
        } => {
            let profile = if inches {
                BodyMeasurementProfile::manual_in_inches(height, chest, waist, shoulder)?
            } else {
                BodyMeasurementProfile::manual(height, chest, waist, shoulder)?
            };
            let cmd = RecommendSizeCommand {
                user_id: UserId::new(user)?,
                clothing_item_id: ClothingItemId::new(item)?,
                profile,
                chart_location: chart,
                preference: fit,
            };
            recommend(cmd, config).await
        }
    }
}

async fn measure(
    landmarks: PathBuf,
    height: Option<f64>,
    config: &AppConfig,
) -> Result<String, DomainError> {
    let source = landmarks.display().to_string();
    let document = LandmarkDocument::read(&landmarks)
        .await
        .map_err(|e| DomainError::from(MeasureFromPhotoError::from(e)))?;
    let image = document.image.ok_or_else(|| {
        DomainError::validation("image", format!("{} has no image dimensions", source))
    })?;

    let provider = match config.detection.min_visibility {
        Some(min) => FileLandmarkProvider::new().with_min_visibility(min),
        None => FileLandmarkProvider::new(),
    };
    let session = Arc::new(PoseSession::new(
        Arc::new(provider),
        config.detection.timeout(),
    ));
    let handler = MeasureFromPhotoHandler::new(
        Arc::clone(&session),
        Arc::new(SubjectSequencers::new()),
        MeasurementExtractor::new(),
        MeasurementSettings {
            min_confidence: config.detection.min_confidence,
            default_reference_height_cm: config.detection.default_reference_height_cm,
        },
    );

    let result = handler
        .handle(MeasureFromPhotoCommand {
            image: ImageInput::new(source, image.width, image.height),
            reference_height_cm: height,
            subject: None,
        })
        .await;
    session.release().await.map_err(release_error)?;
    let result = result?;

    info!(token = %result.token, "Measurement finished");
    to_json(&result)
}

async fn recommend(cmd: RecommendSizeCommand, config: &AppConfig) -> Result<String, DomainError> {
    let charts = match &config.fit.chart_dir {
        Some(dir) => FileSizeChartSource::with_base_dir(dir),
        None => FileSizeChartSource::new(),
    };
    let handler = RecommendSizeHandler::new(
        Arc::new(charts),
        RecommendationSettings {
            default_preference: config.fit.default_preference,
            min_confidence: config.detection.min_confidence,
        },
    );

    let result = handler.handle(cmd).await?;
    to_json(&result)
}

fn release_error(err: DetectionError) -> DomainError {
    DomainError::new(ErrorCode::InternalError, format!("Failed to release pose model: {}", err))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, DomainError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))
}
