use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::classify::MuacAgeGroup;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub assessment: AssessmentConfig,
    #[serde(default)]
    pub muac_presets: MuacPresetConfig,
}

/// MUAC 分類表の選択
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuacScheme {
    /// 年齢4区分の表 {4-6, 7-9, 10-12, 13-15}
    #[default]
    AgeBanded,
    /// 年齢によらない3段階 (Severe / Moderate / Normal)
    Triage,
}

/// MUAC 計測に使うスケール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuacCalibration {
    /// 腕画像内の基準物体を2点クリック
    #[default]
    Reference,
    /// 年齢グループ別の固定係数
    AgeGroupPreset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentConfig {
    /// 対象年齢（下限、年）
    #[serde(default = "default_min_age")]
    pub min_age_years: u32,
    /// 対象年齢（上限、年）
    #[serde(default = "default_max_age")]
    pub max_age_years: u32,
    #[serde(default)]
    pub muac_scheme: MuacScheme,
    #[serde(default)]
    pub muac_calibration: MuacCalibration,
    /// この信頼度以上のキーポイントを検出済みとみなす
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
}

/// 年齢グループ別 MUAC 係数 (cm/pixel)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuacPresetConfig {
    #[serde(default = "default_preset_4_6")]
    pub age_4_6: f64,
    #[serde(default = "default_preset_7_9")]
    pub age_7_9: f64,
    #[serde(default = "default_preset_10_12")]
    pub age_10_12: f64,
    #[serde(default = "default_preset_13_15")]
    pub age_13_15: f64,
}

fn default_min_age() -> u32 { 4 }
fn default_max_age() -> u32 { 15 }
fn default_confidence_threshold() -> f32 { 0.5 }
fn default_preset_4_6() -> f64 { 0.085 }
fn default_preset_7_9() -> f64 { 0.088 }
fn default_preset_10_12() -> f64 { 0.092 }
fn default_preset_13_15() -> f64 { 0.096 }

impl Default for Config {
    fn default() -> Self {
        Self {
            assessment: AssessmentConfig::default(),
            muac_presets: MuacPresetConfig::default(),
        }
    }
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            min_age_years: default_min_age(),
            max_age_years: default_max_age(),
            muac_scheme: MuacScheme::default(),
            muac_calibration: MuacCalibration::default(),
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

impl Default for MuacPresetConfig {
    fn default() -> Self {
        Self {
            age_4_6: default_preset_4_6(),
            age_7_9: default_preset_7_9(),
            age_10_12: default_preset_10_12(),
            age_13_15: default_preset_13_15(),
        }
    }
}

impl MuacPresetConfig {
    pub fn factor_for(&self, group: MuacAgeGroup) -> f64 {
        match group {
            MuacAgeGroup::Age4To6 => self.age_4_6,
            MuacAgeGroup::Age7To9 => self.age_7_9,
            MuacAgeGroup::Age10To12 => self.age_10_12,
            MuacAgeGroup::Age13To15 => self.age_13_15,
        }
    }
}

impl AssessmentConfig {
    pub fn age_in_range(&self, years: u32) -> bool {
        (self.min_age_years..=self.max_age_years).contains(&years)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// 読めなければ既定値で続行
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}; using defaults", e);
                Self::default()
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), content).context("Failed to write config file")?;
        Ok(())
    }
}
