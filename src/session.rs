//! 1回の評価フローの状態
//!
//! 各ステップは明示的なコンテキスト `AssessmentSession` を受け取る。
//! 失敗したステップは取得済みの他の計測値を消さない。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calibration::{CalibrationPoints, CalibrationRatio, PixelPoint};
use crate::classify::{Age, MuacAgeGroup};
use crate::config::{Config, MuacCalibration};
use crate::error::{MeasureError, Result};
use crate::measure::{measure_height, measure_muac, Measurement};
use crate::pose::{ArmLandmarks, HeightLandmarks};
use crate::record::{AssessmentRecord, Clock, Identity, RecordBuilder};

/// アプリのページ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Login,
    SelectFlow,
    NutritionChoices,
    PhysicalAssessment,
    AssessmentReport,
    ViewOldData,
    ViewDataTable,
    NutrimannChoices,
    NutrimannInfo,
    FoodOnly,
    FoodSummary,
    ViewOldFood,
    EditFoodEntry,
}

impl Page {
    /// 戻るボタンの遷移先。表にないページは SelectFlow
    pub fn back(self) -> Page {
        match self {
            Page::NutritionChoices | Page::NutrimannChoices => Page::SelectFlow,
            Page::PhysicalAssessment | Page::ViewOldData | Page::ViewDataTable => {
                Page::NutritionChoices
            }
            Page::ViewOldFood | Page::NutrimannInfo => Page::NutrimannChoices,
            Page::EditFoodEntry => Page::ViewOldFood,
            Page::FoodOnly => Page::NutrimannInfo,
            Page::FoodSummary => Page::FoodOnly,
            Page::Login | Page::SelectFlow | Page::AssessmentReport => Page::SelectFlow,
        }
    }
}

/// 計測の進行状況
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssessmentStep {
    Demographics,
    Height,
    Muac,
    Ready,
}

#[derive(Debug, Clone, Default)]
pub struct AssessmentSession {
    identity: Option<Identity>,
    weight_kg: Option<f64>,
    age: Option<Age>,
    height_points: CalibrationPoints,
    height: Option<Measurement>,
    muac_points: CalibrationPoints,
    muac: Option<Measurement>,
}

impl AssessmentSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 次に必要なステップ
    pub fn step(&self) -> AssessmentStep {
        if self.identity.is_none() {
            AssessmentStep::Demographics
        } else if self.height.is_none() {
            AssessmentStep::Height
        } else if self.muac.is_none() {
            AssessmentStep::Muac
        } else {
            AssessmentStep::Ready
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn age(&self) -> Option<Age> {
        self.age
    }

    pub fn height(&self) -> Option<&Measurement> {
        self.height.as_ref()
    }

    pub fn muac(&self) -> Option<&Measurement> {
        self.muac.as_ref()
    }

    /// 識別情報と体重を登録。年齢は `today` 時点で計算
    pub fn set_demographics(
        &mut self,
        identity: Identity,
        weight_kg: f64,
        today: NaiveDate,
        config: &Config,
    ) -> Result<Age> {
        let age = Age::between(identity.date_of_birth, today).ok_or_else(|| {
            MeasureError::InvalidMeasurement(format!(
                "date of birth {} is in the future",
                identity.date_of_birth
            ))
        })?;
        if !config.assessment.age_in_range(age.years) {
            return Err(MeasureError::InvalidMeasurement(format!(
                "this tool is only for children between {}-{} years old (got {})",
                config.assessment.min_age_years, config.assessment.max_age_years, age.years
            )));
        }
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(MeasureError::InvalidMeasurement(format!(
                "weight must be positive, got {} kg",
                weight_kg
            )));
        }
        debug!(name = %identity.name, %age, weight_kg, "demographics set");
        self.identity = Some(identity);
        self.weight_kg = Some(weight_kg);
        self.age = Some(age);
        Ok(age)
    }

    pub fn click_height_point(&mut self, point: PixelPoint) -> bool {
        self.height_points.push(point)
    }

    pub fn reset_height_points(&mut self) {
        self.height_points.reset();
    }

    pub fn click_muac_point(&mut self, point: PixelPoint) -> bool {
        self.muac_points.push(point)
    }

    pub fn reset_muac_points(&mut self) {
        self.muac_points.reset();
    }

    /// 全身画像のクリック2点と検出結果から身長を計測
    pub fn measure_height(
        &mut self,
        reference_length_cm: f64,
        landmarks: Option<&HeightLandmarks>,
    ) -> Result<Measurement> {
        let ratio = self.height_points.ratio(reference_length_cm)?;
        let m = measure_height(landmarks, ratio)?;
        self.height = Some(m);
        Ok(m)
    }

    /// 腕画像から MUAC を計測
    ///
    /// `reference_length_cm` は基準物体モードでのみ使う。
    pub fn measure_muac(
        &mut self,
        reference_length_cm: Option<f64>,
        arms: &ArmLandmarks,
        config: &Config,
    ) -> Result<Measurement> {
        let ratio = match config.assessment.muac_calibration {
            MuacCalibration::Reference => {
                let reference = reference_length_cm
                    .ok_or(MeasureError::IncompleteAssessment("MUAC reference length"))?;
                self.muac_points.ratio(reference)?
            }
            MuacCalibration::AgeGroupPreset => {
                let age = self
                    .age
                    .ok_or(MeasureError::IncompleteAssessment("date of birth"))?;
                CalibrationRatio::age_group_preset(
                    MuacAgeGroup::from_years(age.years),
                    &config.muac_presets,
                )?
            }
        };
        let m = measure_muac(arms, ratio)?;
        self.muac = Some(m);
        Ok(m)
    }

    /// 手入力の計測値
    pub fn set_manual_height(&mut self, m: Measurement) {
        self.height = Some(m);
    }

    pub fn set_manual_muac(&mut self, m: Measurement) {
        self.muac = Some(m);
    }

    /// レコードを作成
    pub fn finish<C: Clock>(&self, builder: &RecordBuilder<C>) -> Result<AssessmentRecord> {
        let identity = self
            .identity
            .as_ref()
            .ok_or(MeasureError::IncompleteAssessment("demographics"))?;
        let age = self
            .age
            .ok_or(MeasureError::IncompleteAssessment("date of birth"))?;
        let record = builder.build(
            identity,
            self.weight_kg,
            self.height.as_ref(),
            self.muac.as_ref(),
            age,
        )?;
        info!(name = %identity.name, "assessment finished");
        Ok(record)
    }
}
