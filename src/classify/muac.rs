use super::age::MuacAgeGroup;
use super::status::MalnutritionStatus;
use crate::config::MuacScheme;

/// 年齢グループ別の MUAC 判定
pub fn classify_muac(muac_cm: f64, age_group: MuacAgeGroup) -> MalnutritionStatus {
    let (acute, risk) = match age_group {
        MuacAgeGroup::Age4To6 | MuacAgeGroup::Age7To9 => (12.5, 13.5),
        MuacAgeGroup::Age10To12 | MuacAgeGroup::Age13To15 => (13.5, 14.5),
    };
    if muac_cm < acute {
        MalnutritionStatus::AcuteMalnutrition
    } else if muac_cm < risk {
        MalnutritionStatus::RiskOfMalnutrition
    } else {
        MalnutritionStatus::NormalNutrition
    }
}

/// 年齢によらない3段階判定
pub fn classify_muac_triage(muac_cm: f64) -> MalnutritionStatus {
    if muac_cm < 12.5 {
        MalnutritionStatus::SevereAcuteMalnutrition
    } else if muac_cm < 13.5 {
        MalnutritionStatus::ModerateAcuteMalnutrition
    } else {
        MalnutritionStatus::NormalNutrition
    }
}

/// 設定された表で判定
pub fn classify_muac_with(scheme: MuacScheme, muac_cm: f64, age_years: u32) -> MalnutritionStatus {
    match scheme {
        MuacScheme::AgeBanded => classify_muac(muac_cm, MuacAgeGroup::from_years(age_years)),
        MuacScheme::Triage => classify_muac_triage(muac_cm),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_younger_groups_boundaries() {
        use MalnutritionStatus::*;
        for group in [MuacAgeGroup::Age4To6, MuacAgeGroup::Age7To9] {
            assert_eq!(classify_muac(12.49, group), AcuteMalnutrition);
            assert_eq!(classify_muac(12.5, group), RiskOfMalnutrition);
            assert_eq!(classify_muac(13.49, group), RiskOfMalnutrition);
            assert_eq!(classify_muac(13.5, group), NormalNutrition);
        }
    }

    #[test]
    fn test_older_groups_boundaries() {
        use MalnutritionStatus::*;
        for group in [MuacAgeGroup::Age10To12, MuacAgeGroup::Age13To15] {
            assert_eq!(classify_muac(13.49, group), AcuteMalnutrition);
            assert_eq!(classify_muac(13.5, group), RiskOfMalnutrition);
            assert_eq!(classify_muac(14.49, group), RiskOfMalnutrition);
            assert_eq!(classify_muac(14.5, group), NormalNutrition);
        }
    }

    #[test]
    fn test_triage() {
        assert_eq!(classify_muac_triage(12.4), MalnutritionStatus::SevereAcuteMalnutrition);
        assert_eq!(classify_muac_triage(12.5), MalnutritionStatus::ModerateAcuteMalnutrition);
        assert_eq!(classify_muac_triage(13.5), MalnutritionStatus::NormalNutrition);
    }

    #[test]
    fn test_schemes_do_not_merge() {
        // 11歳・14.0cm: 年齢区分表ではリスク、トリアージでは正常
        assert_eq!(
            classify_muac_with(MuacScheme::AgeBanded, 14.0, 11),
            MalnutritionStatus::RiskOfMalnutrition
        );
        assert_eq!(
            classify_muac_with(MuacScheme::Triage, 14.0, 11),
            MalnutritionStatus::NormalNutrition
        );
    }
}
