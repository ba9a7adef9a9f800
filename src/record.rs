//! 評価結果レコードの組み立て
//!
//! レコードは作成後に変更しない。修正は新しいレコードで置き換える。

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classify::{bmi, classify_bmi, classify_muac_with, Age, Gender, MalnutritionStatus};
use crate::config::AssessmentConfig;
use crate::error::{MeasureError, Result};
use crate::measure::{round_to, Measurement, MeasurementKind};

/// 作成時刻の取得元
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// ローカル時刻
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// 固定時刻（テスト・再計算用）
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// 子どもの識別情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
}

impl Identity {
    pub fn new(name: impl Into<String>, date_of_birth: NaiveDate, gender: Gender) -> Self {
        Self {
            name: name.into(),
            date_of_birth,
            gender,
        }
    }
}

mod assessment_date {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&dt.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// 1回分の評価結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Date of Birth")]
    date_of_birth: NaiveDate,
    #[serde(rename = "Age")]
    age: Age,
    #[serde(rename = "Gender")]
    gender: Gender,
    #[serde(rename = "Weight (kg)")]
    weight_kg: f64,
    #[serde(rename = "Height (cm)")]
    height_cm: f64,
    #[serde(rename = "MUAC (cm)")]
    muac_cm: f64,
    #[serde(rename = "BMI")]
    bmi: f64,
    #[serde(rename = "BMI Status")]
    bmi_status: MalnutritionStatus,
    #[serde(rename = "MUAC Status")]
    muac_status: MalnutritionStatus,
    #[serde(rename = "Assessment Date", with = "assessment_date")]
    assessed_at: NaiveDateTime,
}

impl AssessmentRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    pub fn age(&self) -> Age {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    /// 小数2桁
    pub fn height_cm(&self) -> f64 {
        self.height_cm
    }

    /// 小数2桁
    pub fn muac_cm(&self) -> f64 {
        self.muac_cm
    }

    /// 小数1桁
    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    pub fn bmi_status(&self) -> MalnutritionStatus {
        self.bmi_status
    }

    pub fn muac_status(&self) -> MalnutritionStatus {
        self.muac_status
    }

    pub fn assessed_at(&self) -> NaiveDateTime {
        self.assessed_at
    }

    /// 保存側の重複判定キー（名前＋年齢）
    pub fn is_duplicate_of(&self, other: &AssessmentRecord) -> bool {
        self.name == other.name && self.age.years == other.age.years
    }
}

/// 計測値と識別情報からレコードを作る
pub struct RecordBuilder<C: Clock = SystemClock> {
    config: AssessmentConfig,
    clock: C,
}

impl RecordBuilder<SystemClock> {
    pub fn new(config: AssessmentConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> RecordBuilder<C> {
    pub fn with_clock(config: AssessmentConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    /// 全ての計測が揃っていればレコードを返す
    ///
    /// BMI は丸める前の身長から計算し、分類も丸める前の値で行う。
    pub fn build(
        &self,
        identity: &Identity,
        weight_kg: Option<f64>,
        height: Option<&Measurement>,
        muac: Option<&Measurement>,
        age: Age,
    ) -> Result<AssessmentRecord> {
        if identity.name.trim().is_empty() {
            return Err(MeasureError::IncompleteAssessment("name"));
        }
        let weight_kg = weight_kg.ok_or(MeasureError::IncompleteAssessment("weight"))?;
        let height = height.ok_or(MeasureError::IncompleteAssessment("height"))?;
        let muac = muac.ok_or(MeasureError::IncompleteAssessment("MUAC"))?;

        expect_kind(height, MeasurementKind::Height)?;
        expect_kind(muac, MeasurementKind::Muac)?;
        if !self.config.age_in_range(age.years) {
            return Err(MeasureError::InvalidMeasurement(format!(
                "age {} is outside the supported range {}-{} years",
                age.years, self.config.min_age_years, self.config.max_age_years
            )));
        }

        let bmi_value = bmi(weight_kg, height.cm)?;
        let bmi_status = classify_bmi(bmi_value, age.years, identity.gender);
        let muac_status = classify_muac_with(self.config.muac_scheme, muac.cm, age.years);

        let record = AssessmentRecord {
            name: identity.name.clone(),
            date_of_birth: identity.date_of_birth,
            age,
            gender: identity.gender,
            weight_kg,
            height_cm: round_to(height.cm, 2),
            muac_cm: round_to(muac.cm, 2),
            bmi: round_to(bmi_value, 1),
            bmi_status,
            muac_status,
            assessed_at: self.clock.now(),
        };
        info!(
            name = %record.name,
            bmi = record.bmi,
            bmi_status = %record.bmi_status,
            muac_status = %record.muac_status,
            "assessment record built"
        );
        Ok(record)
    }
}

fn expect_kind(m: &Measurement, kind: MeasurementKind) -> Result<()> {
    if m.kind != kind {
        return Err(MeasureError::InvalidMeasurement(format!(
            "expected a {} measurement, got {}",
            kind.label(),
            m.kind.label()
        )));
    }
    if !m.cm.is_finite() || m.cm < 0.0 {
        return Err(MeasureError::InvalidMeasurement(format!(
            "{} must be non-negative, got {} cm",
            kind.label(),
            m.cm
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MuacScheme;

    fn frozen() -> FixedClock {
        let dt = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        FixedClock(dt)
    }

    fn child() -> Identity {
        Identity::new(
            "Asha",
            NaiveDate::from_ymd_opt(2017, 2, 14).unwrap(),
            Gender::Female,
        )
    }

    fn height(cm: f64) -> Measurement {
        Measurement { kind: MeasurementKind::Height, cm }
    }

    fn muac(cm: f64) -> Measurement {
        Measurement { kind: MeasurementKind::Muac, cm }
    }

    #[test]
    fn test_build_rounds_and_classifies() {
        let builder = RecordBuilder::with_clock(AssessmentConfig::default(), frozen());
        let rec = builder
            .build(
                &child(),
                Some(20.0),
                Some(&height(120.004)),
                Some(&muac(13.456)),
                Age { years: 7, months: 2 },
            )
            .unwrap();

        assert_eq!(rec.height_cm(), 120.0);
        assert_eq!(rec.muac_cm(), 13.46);
        assert_eq!(rec.bmi(), 13.9);
        assert_eq!(rec.bmi_status(), MalnutritionStatus::SeverelyUnderweight);
        assert_eq!(rec.muac_status(), MalnutritionStatus::RiskOfMalnutrition);
        assert_eq!(rec.assessed_at(), frozen().0);
    }

    #[test]
    fn test_missing_muac() {
        let builder = RecordBuilder::with_clock(AssessmentConfig::default(), frozen());
        let err = builder
            .build(&child(), Some(20.0), Some(&height(120.0)), None, Age::from_years(7))
            .unwrap_err();
        assert_eq!(err, MeasureError::IncompleteAssessment("MUAC"));
    }

    #[test]
    fn test_missing_height_and_weight() {
        let builder = RecordBuilder::with_clock(AssessmentConfig::default(), frozen());
        assert_eq!(
            builder
                .build(&child(), Some(20.0), None, Some(&muac(14.0)), Age::from_years(7))
                .unwrap_err(),
            MeasureError::IncompleteAssessment("height")
        );
        assert_eq!(
            builder
                .build(&child(), None, Some(&height(120.0)), Some(&muac(14.0)), Age::from_years(7))
                .unwrap_err(),
            MeasureError::IncompleteAssessment("weight")
        );
    }

    #[test]
    fn test_rejects_swapped_measurements() {
        let builder = RecordBuilder::with_clock(AssessmentConfig::default(), frozen());
        let err = builder
            .build(&child(), Some(20.0), Some(&muac(14.0)), Some(&muac(14.0)), Age::from_years(7))
            .unwrap_err();
        assert!(matches!(err, MeasureError::InvalidMeasurement(_)));
    }

    #[test]
    fn test_rejects_age_out_of_range_and_bad_weight() {
        let builder = RecordBuilder::with_clock(AssessmentConfig::default(), frozen());
        let err = builder
            .build(&child(), Some(20.0), Some(&height(120.0)), Some(&muac(14.0)), Age::from_years(16))
            .unwrap_err();
        assert!(matches!(err, MeasureError::InvalidMeasurement(_)));

        let err = builder
            .build(&child(), Some(-1.0), Some(&height(120.0)), Some(&muac(14.0)), Age::from_years(7))
            .unwrap_err();
        assert!(matches!(err, MeasureError::InvalidMeasurement(_)));
    }

    #[test]
    fn test_frozen_clock_is_deterministic() {
        let builder = RecordBuilder::with_clock(AssessmentConfig::default(), frozen());
        let build = || {
            builder
                .build(&child(), Some(24.0), Some(&height(128.3)), Some(&muac(15.2)), Age::from_years(8))
                .unwrap()
        };
        let a = serde_json::to_vec(&build()).unwrap();
        let b = serde_json::to_vec(&build()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_triage_scheme() {
        let config = AssessmentConfig {
            muac_scheme: MuacScheme::Triage,
            ..AssessmentConfig::default()
        };
        let builder = RecordBuilder::with_clock(config, frozen());
        let rec = builder
            .build(&child(), Some(20.0), Some(&height(120.0)), Some(&muac(13.0)), Age::from_years(11))
            .unwrap();
        assert_eq!(rec.muac_status(), MalnutritionStatus::ModerateAcuteMalnutrition);
    }

    #[test]
    fn test_serialized_keys() {
        let builder = RecordBuilder::with_clock(AssessmentConfig::default(), frozen());
        let rec = builder
            .build(&child(), Some(20.0), Some(&height(120.0)), Some(&muac(14.0)), Age::from_years(7))
            .unwrap();
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["Name"], "Asha");
        assert_eq!(value["Date of Birth"], "2017-02-14");
        assert_eq!(value["Age"], "7y 0m");
        assert_eq!(value["BMI Status"], "Severely Underweight");
        assert_eq!(value["MUAC Status"], "Normal Nutrition Status");
        assert_eq!(value["Assessment Date"], "2024-05-01 10:30:00");

        let back: AssessmentRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn test_duplicate_key() {
        let builder = RecordBuilder::with_clock(AssessmentConfig::default(), frozen());
        let a = builder
            .build(&child(), Some(20.0), Some(&height(120.0)), Some(&muac(14.0)), Age { years: 7, months: 1 })
            .unwrap();
        let b = builder
            .build(&child(), Some(21.0), Some(&height(121.0)), Some(&muac(14.2)), Age { years: 7, months: 5 })
            .unwrap();
        let c = builder
            .build(&child(), Some(21.0), Some(&height(121.0)), Some(&muac(14.2)), Age::from_years(8))
            .unwrap();
        assert!(a.is_duplicate_of(&b));
        assert!(!a.is_duplicate_of(&c));
    }
}
