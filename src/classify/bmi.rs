use serde::{Deserialize, Serialize};
use std::fmt;

use super::age::BmiAgeBand;
use super::status::MalnutritionStatus;
use crate::error::{MeasureError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => f.write_str("Male"),
            Self::Female => f.write_str("Female"),
        }
    }
}

/// weight(kg) / height(m)^2
pub fn bmi(weight_kg: f64, height_cm: f64) -> Result<f64> {
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(MeasureError::InvalidMeasurement(format!(
            "height must be positive, got {} cm",
            height_cm
        )));
    }
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(MeasureError::InvalidMeasurement(format!(
            "weight must be positive, got {} kg",
            weight_kg
        )));
    }
    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

/// 昇順の閾値 [重度低体重, 低体重, 標準] 。それぞれ未満で該当、最後以上は過体重
fn cut_points(band: BmiAgeBand, gender: Gender) -> [f64; 3] {
    match (band, gender) {
        (BmiAgeBand::Under5, _) => [14.0, 16.0, 18.0],
        (BmiAgeBand::Age5To9, _) => [15.0, 17.0, 20.0],
        (BmiAgeBand::Age10To15, Gender::Male) => [16.0, 18.5, 25.0],
        (BmiAgeBand::Age10To15, Gender::Female) => [15.5, 18.0, 24.0],
    }
}

/// 年齢区分・性別ごとの BMI 判定
pub fn classify_bmi(bmi: f64, age_years: u32, gender: Gender) -> MalnutritionStatus {
    let [severe, under, normal] = cut_points(BmiAgeBand::from_years(age_years), gender);
    if bmi < severe {
        MalnutritionStatus::SeverelyUnderweight
    } else if bmi < under {
        MalnutritionStatus::Underweight
    } else if bmi < normal {
        MalnutritionStatus::NormalWeight
    } else {
        MalnutritionStatus::Overweight
    }
}
