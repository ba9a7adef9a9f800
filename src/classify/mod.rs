pub mod age;
pub mod bmi;
pub mod muac;
pub mod status;

pub use age::{Age, BmiAgeBand, MuacAgeGroup};
pub use bmi::{bmi, classify_bmi, Gender};
pub use muac::{classify_muac, classify_muac_triage, classify_muac_with};
pub use status::{MalnutritionStatus, Severity};
