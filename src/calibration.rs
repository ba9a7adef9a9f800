use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::MuacAgeGroup;
use crate::config::MuacPresetConfig;
use crate::error::{MeasureError, Result};

// --- データ構造 ---

/// 画像上のピクセル座標
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// ユークリッド距離（ピクセル）
    pub fn distance(&self, other: &PixelPoint) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }
}

impl From<(i32, i32)> for PixelPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// cm/pixel のスケール係数（常に正）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct CalibrationRatio(f64);

impl TryFrom<f64> for CalibrationRatio {
    type Error = MeasureError;

    fn try_from(cm_per_pixel: f64) -> Result<Self> {
        Self::new(cm_per_pixel)
    }
}

impl From<CalibrationRatio> for f64 {
    fn from(ratio: CalibrationRatio) -> f64 {
        ratio.0
    }
}

impl CalibrationRatio {
    /// 既知の値から作成。0以下・非有限は拒否
    pub fn new(cm_per_pixel: f64) -> Result<Self> {
        if !cm_per_pixel.is_finite() || cm_per_pixel <= 0.0 {
            return Err(MeasureError::InvalidMeasurement(format!(
                "calibration ratio must be positive, got {}",
                cm_per_pixel
            )));
        }
        Ok(Self(cm_per_pixel))
    }

    pub fn cm_per_pixel(&self) -> f64 {
        self.0
    }

    /// 年齢グループ別の固定係数
    ///
    /// 基準物体なしで撮影した腕画像用。設定で明示的に選んだ場合のみ使う。
    pub fn age_group_preset(group: MuacAgeGroup, presets: &MuacPresetConfig) -> Result<Self> {
        Self::new(presets.factor_for(group))
    }
}

// --- キャリブレーション ---

/// 基準物体上の2点と実寸からcm/pixelを算出
///
/// 2点が一致する場合はゼロ除算せず `DegenerateCalibration` を返す。
pub fn calibrate(
    point_a: PixelPoint,
    point_b: PixelPoint,
    reference_length_cm: f64,
) -> Result<CalibrationRatio> {
    if !reference_length_cm.is_finite() || reference_length_cm <= 0.0 {
        return Err(MeasureError::InvalidMeasurement(format!(
            "reference length must be positive, got {} cm",
            reference_length_cm
        )));
    }
    if point_a == point_b {
        return Err(MeasureError::DegenerateCalibration {
            x: point_a.x,
            y: point_a.y,
        });
    }

    let pixel_dist = point_a.distance(&point_b);
    let ratio = CalibrationRatio(reference_length_cm / pixel_dist);
    debug!(
        pixel_dist,
        reference_length_cm,
        cm_per_pixel = ratio.0,
        "calibration computed"
    );
    Ok(ratio)
}

/// 基準物体のクリック2点を集める
///
/// 2点揃った後のクリックは無視。やり直しは `reset`。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPoints {
    points: Vec<PixelPoint>,
}

impl CalibrationPoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// クリック位置を追加。受け付けた場合 true
    pub fn push(&mut self, point: PixelPoint) -> bool {
        if self.points.len() >= 2 {
            return false;
        }
        self.points.push(point);
        true
    }

    pub fn reset(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[PixelPoint] {
        &self.points
    }

    pub fn is_complete(&self) -> bool {
        self.points.len() == 2
    }

    /// 2点揃っていればキャリブレーション
    pub fn ratio(&self, reference_length_cm: f64) -> Result<CalibrationRatio> {
        match self.points.as_slice() {
            [a, b] => calibrate(*a, *b, reference_length_cm),
            _ => Err(MeasureError::IncompleteAssessment("calibration points")),
        }
    }
}
