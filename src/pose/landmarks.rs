use serde::{Deserialize, Serialize};

use super::keypoint::{KeypointIndex, Pose};
use crate::calibration::PixelPoint;

/// 身長計測用のランドマーク（頭と両足首）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightLandmarks {
    pub head: PixelPoint,
    pub left_ankle: PixelPoint,
    pub right_ankle: PixelPoint,
}

impl HeightLandmarks {
    /// 鼻と両足首が全て検出されていれば Some
    pub fn from_pose(pose: &Pose, width: u32, height: u32, threshold: f32) -> Option<Self> {
        let head = pose.pixel(KeypointIndex::Nose, width, height, threshold)?;
        let left_ankle = pose.pixel(KeypointIndex::LeftAnkle, width, height, threshold)?;
        let right_ankle = pose.pixel(KeypointIndex::RightAnkle, width, height, threshold)?;
        Some(Self {
            head,
            left_ankle,
            right_ankle,
        })
    }

    /// 足の位置: 画像で下側（yが大きい）の足首を頭と同じ列に投影
    ///
    /// 片足が浮いていても身長を短く見積もらないよう max を取る。
    pub fn foot(&self) -> PixelPoint {
        let foot_y = self.left_ankle.y.max(self.right_ankle.y);
        PixelPoint::new(self.head.x, foot_y)
    }
}

/// 肩から肘までの区間
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmSegment {
    pub shoulder: PixelPoint,
    pub elbow: PixelPoint,
}

/// MUAC 計測用の左右の腕
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmLandmarks {
    pub left: Option<ArmSegment>,
    pub right: Option<ArmSegment>,
}

impl ArmLandmarks {
    pub fn from_pose(pose: &Pose, width: u32, height: u32, threshold: f32) -> Self {
        let segment = |shoulder: KeypointIndex, elbow: KeypointIndex| {
            Some(ArmSegment {
                shoulder: pose.pixel(shoulder, width, height, threshold)?,
                elbow: pose.pixel(elbow, width, height, threshold)?,
            })
        };
        Self {
            left: segment(KeypointIndex::LeftShoulder, KeypointIndex::LeftElbow),
            right: segment(KeypointIndex::RightShoulder, KeypointIndex::RightElbow),
        }
    }

    /// 計測に使う腕。両方あれば左腕を優先（信頼度では選ばない）
    pub fn selected(&self) -> Option<ArmSegment> {
        self.left.or(self.right)
    }
}
