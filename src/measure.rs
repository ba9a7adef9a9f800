//! ランドマークのピクセル距離を実寸 (cm) に変換する

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calibration::{CalibrationRatio, PixelPoint};
use crate::error::{MeasureError, Result};
use crate::pose::{ArmLandmarks, HeightLandmarks};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasurementKind {
    Height,
    Muac,
}

impl MeasurementKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Height => "height",
            Self::Muac => "MUAC",
        }
    }
}

/// 実寸の長さ（cm、非負）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub kind: MeasurementKind,
    pub cm: f64,
}

impl Measurement {
    /// 手入力された値。0以下・非有限は拒否
    pub fn manual(kind: MeasurementKind, cm: f64) -> Result<Self> {
        if !cm.is_finite() || cm <= 0.0 {
            return Err(MeasureError::InvalidMeasurement(format!(
                "{} must be positive, got {} cm",
                kind.label(),
                cm
            )));
        }
        Ok(Self { kind, cm })
    }

    /// 表示・保存用 (小数2桁)
    pub fn rounded(&self) -> f64 {
        round_to(self.cm, 2)
    }
}

/// 小数 `digits` 桁に丸める
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

/// 2点間のピクセル距離 × cm/pixel
pub fn to_measurement(
    kind: MeasurementKind,
    landmark_a: PixelPoint,
    landmark_b: PixelPoint,
    ratio: CalibrationRatio,
) -> Measurement {
    let pixel_dist = landmark_a.distance(&landmark_b);
    Measurement {
        kind,
        cm: pixel_dist * ratio.cm_per_pixel(),
    }
}

/// 頭から下側の足首までの身長
pub fn measure_height(
    landmarks: Option<&HeightLandmarks>,
    ratio: CalibrationRatio,
) -> Result<Measurement> {
    let Some(lm) = landmarks else {
        warn!("body landmarks not detected");
        return Err(MeasureError::LandmarksUnavailable("head/ankle"));
    };
    let m = to_measurement(MeasurementKind::Height, lm.head, lm.foot(), ratio);
    info!(height_cm = m.rounded(), "height estimated");
    Ok(m)
}

/// 肩から肘までの距離 (左腕優先)
pub fn measure_muac(arms: &ArmLandmarks, ratio: CalibrationRatio) -> Result<Measurement> {
    let Some(arm) = arms.selected() else {
        warn!("arm landmarks not detected");
        return Err(MeasureError::LandmarksUnavailable("arm"));
    };
    let m = to_measurement(MeasurementKind::Muac, arm.shoulder, arm.elbow, ratio);
    info!(muac_cm = m.rounded(), "MUAC estimated");
    Ok(m)
}
