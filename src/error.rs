//! 計測パイプラインのエラー型
//!
//! どのエラーも直近の呼び出し元に返す。リトライはUI側の判断。

/// 計測・分類で発生するエラー
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeasureError {
    /// キャリブレーション用の2点が同一座標
    #[error("calibration points coincide at ({x}, {y}); select two distinct points")]
    DegenerateCalibration { x: i32, y: i32 },

    /// 姿勢検出で必要なランドマークが得られなかった
    #[error("{0} landmarks unavailable; try a clearer image")]
    LandmarksUnavailable(&'static str),

    /// 0以下・非有限の身長/体重/基準長、または対象年齢外
    #[error("invalid measurement: {0}")]
    InvalidMeasurement(String),

    /// 必須項目が揃う前にレコードを組み立てようとした
    #[error("assessment incomplete: missing {0}")]
    IncompleteAssessment(&'static str),
}

pub type Result<T> = std::result::Result<T, MeasureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MeasureError::DegenerateCalibration { x: 3, y: 4 };
        assert!(err.to_string().contains("(3, 4)"));

        let err = MeasureError::LandmarksUnavailable("arm");
        assert_eq!(err.to_string(), "arm landmarks unavailable; try a clearer image");

        let err = MeasureError::IncompleteAssessment("MUAC");
        assert_eq!(err.to_string(), "assessment incomplete: missing MUAC");
    }
}
