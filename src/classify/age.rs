use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MeasureError;

/// 満年齢（年＋端数の月）
///
/// シリアライズ時は表示と同じ `"7y 2m"` 形式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Age {
    pub years: u32,
    pub months: u32,
}

impl Age {
    pub fn from_years(years: u32) -> Self {
        Self { years, months: 0 }
    }

    /// 生年月日と基準日から計算。未来の生年月日は None
    pub fn between(date_of_birth: NaiveDate, today: NaiveDate) -> Option<Self> {
        if date_of_birth > today {
            return None;
        }
        let mut total_months = (today.year() - date_of_birth.year()) * 12
            + today.month() as i32
            - date_of_birth.month() as i32;
        if today.day() < date_of_birth.day() {
            total_months -= 1;
        }
        let total_months = u32::try_from(total_months).ok()?;
        Some(Self {
            years: total_months / 12,
            months: total_months % 12,
        })
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}y {}m", self.years, self.months)
    }
}

impl FromStr for Age {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MeasureError::InvalidMeasurement(format!("invalid age '{}'", s));
        let (years, months) = s.trim().split_once(' ').ok_or_else(invalid)?;
        let years = years
            .strip_suffix('y')
            .and_then(|v| v.parse().ok())
            .ok_or_else(invalid)?;
        let months: u32 = months
            .trim()
            .strip_suffix('m')
            .and_then(|v| v.parse().ok())
            .ok_or_else(invalid)?;
        if months >= 12 {
            return Err(invalid());
        }
        Ok(Self { years, months })
    }
}

impl TryFrom<String> for Age {
    type Error = MeasureError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Age> for String {
    fn from(age: Age) -> String {
        age.to_string()
    }
}

/// BMI 判定用の年齢区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BmiAgeBand {
    Under5,
    Age5To9,
    /// 10歳以上は全てここ
    Age10To15,
}

impl BmiAgeBand {
    pub fn from_years(years: u32) -> Self {
        match years {
            0..=4 => Self::Under5,
            5..=9 => Self::Age5To9,
            _ => Self::Age10To15,
        }
    }
}

/// MUAC 判定用の年齢グループ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MuacAgeGroup {
    #[serde(rename = "4-6")]
    Age4To6,
    #[serde(rename = "7-9")]
    Age7To9,
    #[serde(rename = "10-12")]
    Age10To12,
    #[serde(rename = "13-15")]
    Age13To15,
}

impl MuacAgeGroup {
    pub fn from_years(years: u32) -> Self {
        match years {
            0..=6 => Self::Age4To6,
            7..=9 => Self::Age7To9,
            10..=12 => Self::Age10To12,
            _ => Self::Age13To15,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Age4To6 => "4-6",
            Self::Age7To9 => "7-9",
            Self::Age10To12 => "10-12",
            Self::Age13To15 => "13-15",
        }
    }
}

impl fmt::Display for MuacAgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_birthday_reached() {
        let age = Age::between(date(2015, 3, 10), date(2024, 3, 10)).unwrap();
        assert_eq!(age, Age { years: 9, months: 0 });
    }

    #[test]
    fn test_age_birthday_not_reached() {
        let age = Age::between(date(2015, 3, 10), date(2024, 3, 9)).unwrap();
        assert_eq!(age, Age { years: 8, months: 11 });
        assert_eq!(age.to_string(), "8y 11m");
    }

    #[test]
    fn test_age_month_remainder() {
        let age = Age::between(date(2018, 1, 31), date(2024, 8, 15)).unwrap();
        assert_eq!(age, Age { years: 6, months: 6 });
    }

    #[test]
    fn test_age_text_form() {
        let age = Age { years: 7, months: 2 };
        assert_eq!(serde_json::to_string(&age).unwrap(), "\"7y 2m\"");
        assert_eq!(serde_json::from_str::<Age>("\"7y 2m\"").unwrap(), age);
        assert_eq!("12y 0m".parse::<Age>().unwrap(), Age::from_years(12));
        assert!("7 years".parse::<Age>().is_err());
        assert!("7y 14m".parse::<Age>().is_err());
    }

    #[test]
    fn test_age_future_birth() {
        assert!(Age::between(date(2030, 1, 1), date(2024, 1, 1)).is_none());
    }

    #[test]
    fn test_bmi_age_bands() {
        assert_eq!(BmiAgeBand::from_years(4), BmiAgeBand::Under5);
        assert_eq!(BmiAgeBand::from_years(5), BmiAgeBand::Age5To9);
        assert_eq!(BmiAgeBand::from_years(9), BmiAgeBand::Age5To9);
        assert_eq!(BmiAgeBand::from_years(10), BmiAgeBand::Age10To15);
        assert_eq!(BmiAgeBand::from_years(15), BmiAgeBand::Age10To15);
    }

    #[test]
    fn test_muac_age_groups_contiguous() {
        let expected = [
            (4, "4-6"), (5, "4-6"), (6, "4-6"),
            (7, "7-9"), (8, "7-9"), (9, "7-9"),
            (10, "10-12"), (11, "10-12"), (12, "10-12"),
            (13, "13-15"), (14, "13-15"), (15, "13-15"),
        ];
        for (years, label) in expected {
            assert_eq!(MuacAgeGroup::from_years(years).label(), label, "age {}", years);
        }
    }
}
