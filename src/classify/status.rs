use serde::{Deserialize, Serialize};
use std::fmt;

/// 栄養状態の判定結果
///
/// BMI 系と MUAC 系（年齢区分表・3段階トリアージ）のラベルを全て含む。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MalnutritionStatus {
    #[serde(rename = "Severely Underweight")]
    SeverelyUnderweight,
    #[serde(rename = "Underweight")]
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    #[serde(rename = "Overweight")]
    Overweight,
    #[serde(rename = "Acute Malnutrition")]
    AcuteMalnutrition,
    #[serde(rename = "Risk of Malnutrition")]
    RiskOfMalnutrition,
    #[serde(rename = "Severe Acute Malnutrition")]
    SevereAcuteMalnutrition,
    #[serde(rename = "Moderate Acute Malnutrition")]
    ModerateAcuteMalnutrition,
    #[serde(rename = "Normal Nutrition Status")]
    NormalNutrition,
}

/// 表示色・対応の緊急度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

impl MalnutritionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SeverelyUnderweight => "Severely Underweight",
            Self::Underweight => "Underweight",
            Self::NormalWeight => "Normal weight",
            Self::Overweight => "Overweight",
            Self::AcuteMalnutrition => "Acute Malnutrition",
            Self::RiskOfMalnutrition => "Risk of Malnutrition",
            Self::SevereAcuteMalnutrition => "Severe Acute Malnutrition",
            Self::ModerateAcuteMalnutrition => "Moderate Acute Malnutrition",
            Self::NormalNutrition => "Normal Nutrition Status",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::SeverelyUnderweight
            | Self::AcuteMalnutrition
            | Self::SevereAcuteMalnutrition => Severity::Critical,
            Self::Underweight
            | Self::Overweight
            | Self::RiskOfMalnutrition
            | Self::ModerateAcuteMalnutrition => Severity::Warning,
            Self::NormalWeight | Self::NormalNutrition => Severity::Normal,
        }
    }
}

impl fmt::Display for MalnutritionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Severity {
    /// RGB
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Normal => (0, 128, 0),
            Self::Warning => (255, 165, 0),
            Self::Critical => (255, 0, 0),
        }
    }

    /// レポートの推奨事項
    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            Self::Critical => &[
                "Refer to healthcare provider immediately",
                "Nutritional supplementation needed",
                "Close monitoring required",
            ],
            Self::Warning => &[
                "Dietary counseling advised",
                "Regular monitoring suggested",
                "Consider nutritional supplements",
            ],
            Self::Normal => &[
                "Maintain balanced diet",
                "Continue regular check-ups",
                "Monitor growth patterns",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_serde() {
        let status = MalnutritionStatus::RiskOfMalnutrition;
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, format!("\"{}\"", status.label()));
    }

    #[test]
    fn test_severity() {
        assert_eq!(MalnutritionStatus::AcuteMalnutrition.severity(), Severity::Critical);
        assert_eq!(MalnutritionStatus::ModerateAcuteMalnutrition.severity(), Severity::Warning);
        assert_eq!(MalnutritionStatus::NormalWeight.severity(), Severity::Normal);
        assert!(Severity::Critical > Severity::Warning);
    }

    #[test]
    fn test_severity_colors() {
        assert_eq!(Severity::Critical.color(), (255, 0, 0));
        assert_eq!(Severity::Warning.color(), (255, 165, 0));
        assert_eq!(Severity::Normal.color(), (0, 128, 0));
        assert_eq!(MalnutritionStatus::SevereAcuteMalnutrition.severity().color(), (255, 0, 0));
    }

    #[test]
    fn test_recommendations() {
        assert_eq!(Severity::Critical.recommendations().len(), 3);
        assert_eq!(Severity::Normal.recommendations()[0], "Maintain balanced diet");
    }
}
