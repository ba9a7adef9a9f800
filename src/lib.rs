pub mod calibration;
pub mod classify;
pub mod config;
pub mod error;
pub mod measure;
pub mod pose;
pub mod record;
pub mod session;

pub use error::{MeasureError, Result};
