use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use malnocare::calibration::PixelPoint;
use malnocare::classify::Gender;
use malnocare::config::Config;
use malnocare::measure::{Measurement, MeasurementKind};
use malnocare::pose::{ArmLandmarks, HeightLandmarks, Pose};
use malnocare::record::{Identity, RecordBuilder};
use malnocare::session::AssessmentSession;

const CONFIG_PATH: &str = "config.toml";

/// 入力ファイル (JSON)
#[derive(Debug, Deserialize)]
struct AssessmentInput {
    name: String,
    date_of_birth: NaiveDate,
    gender: Gender,
    weight_kg: f64,
    /// 年齢計算の基準日（省略時は今日）
    #[serde(default)]
    assessed_on: Option<NaiveDate>,
    height: CaptureInput,
    muac: CaptureInput,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CaptureInput {
    Manual { manual_cm: f64 },
    Image(ImageCapture),
}

/// 画像1枚分のクリックと検出結果
#[derive(Debug, Deserialize)]
struct ImageCapture {
    #[serde(default)]
    reference_length_cm: Option<f64>,
    #[serde(default)]
    points: Vec<PixelPoint>,
    width: u32,
    height: u32,
    /// 検出できなかった場合は null
    #[serde(default)]
    pose: Option<Pose>,
}

fn parse_args() -> Result<(PathBuf, Option<PathBuf>)> {
    let args: Vec<String> = std::env::args().collect();
    // Usage: malnocare <assessment.json> [config.toml]
    match args.len() {
        2 => Ok((PathBuf::from(&args[1]), None)),
        3 => Ok((PathBuf::from(&args[1]), Some(PathBuf::from(&args[2])))),
        _ => bail!("Usage: {} <assessment.json> [config.toml]", args[0]),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let (input_path, config_path) = parse_args()?;
    let config = match config_path {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(CONFIG_PATH),
    };

    info!(version = env!("MALNOCARE_VERSION"), "MalnoCare assessment");

    let content = fs::read_to_string(&input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;
    let input: AssessmentInput =
        serde_json::from_str(&content).context("Failed to parse assessment input")?;

    let today = input
        .assessed_on
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let threshold = config.assessment.confidence_threshold;

    let mut session = AssessmentSession::new();
    let identity = Identity::new(input.name, input.date_of_birth, input.gender);
    let age = session.set_demographics(identity, input.weight_kg, today, &config)?;
    info!(%age, "age computed");

    // [1/2] 身長
    match &input.height {
        CaptureInput::Manual { manual_cm } => {
            session.set_manual_height(Measurement::manual(MeasurementKind::Height, *manual_cm)?);
        }
        CaptureInput::Image(capture) => {
            for p in &capture.points {
                session.click_height_point(*p);
            }
            let reference = capture
                .reference_length_cm
                .context("height capture needs reference_length_cm")?;
            let landmarks = capture
                .pose
                .as_ref()
                .and_then(|pose| HeightLandmarks::from_pose(pose, capture.width, capture.height, threshold));
            session.measure_height(reference, landmarks.as_ref())?;
        }
    }

    // [2/2] MUAC
    match &input.muac {
        CaptureInput::Manual { manual_cm } => {
            session.set_manual_muac(Measurement::manual(MeasurementKind::Muac, *manual_cm)?);
        }
        CaptureInput::Image(capture) => {
            for p in &capture.points {
                session.click_muac_point(*p);
            }
            let arms = capture
                .pose
                .as_ref()
                .map(|pose| ArmLandmarks::from_pose(pose, capture.width, capture.height, threshold))
                .unwrap_or_default();
            session.measure_muac(capture.reference_length_cm, &arms, &config)?;
        }
    }

    let builder = RecordBuilder::new(config.assessment.clone());
    let record = session.finish(&builder)?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    let severity = record.bmi_status().severity().max(record.muac_status().severity());
    for line in severity.recommendations() {
        info!("recommendation: {}", line);
    }
    Ok(())
}
