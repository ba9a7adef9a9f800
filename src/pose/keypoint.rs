use serde::{Deserialize, Serialize};

use crate::calibration::PixelPoint;

/// 体のキーポイント名
///
/// 生のインデックスは検出器のレイアウトによって異なる（`PoseLayout::index_of`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypointIndex {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

/// 検出器の出力レイアウト
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseLayout {
    /// MoveNet などの COCO 17 キーポイント
    Coco17,
    /// MediaPipe BlazePose の 33 ランドマーク
    #[default]
    BlazePose33,
}

impl PoseLayout {
    pub fn keypoint_count(&self) -> usize {
        match self {
            Self::Coco17 => 17,
            Self::BlazePose33 => 33,
        }
    }

    /// キーポイント名 → 生インデックス
    pub fn index_of(&self, index: KeypointIndex) -> usize {
        use KeypointIndex::*;
        match self {
            Self::Coco17 => match index {
                Nose => 0,
                LeftEye => 1,
                RightEye => 2,
                LeftEar => 3,
                RightEar => 4,
                LeftShoulder => 5,
                RightShoulder => 6,
                LeftElbow => 7,
                RightElbow => 8,
                LeftWrist => 9,
                RightWrist => 10,
                LeftHip => 11,
                RightHip => 12,
                LeftKnee => 13,
                RightKnee => 14,
                LeftAnkle => 15,
                RightAnkle => 16,
            },
            Self::BlazePose33 => match index {
                Nose => 0,
                LeftEye => 2,
                RightEye => 5,
                LeftEar => 7,
                RightEar => 8,
                LeftShoulder => 11,
                RightShoulder => 12,
                LeftElbow => 13,
                RightElbow => 14,
                LeftWrist => 15,
                RightWrist => 16,
                LeftHip => 23,
                RightHip => 24,
                LeftKnee => 25,
                RightKnee => 26,
                LeftAnkle => 27,
                RightAnkle => 28,
            },
        }
    }
}

/// 単一キーポイント
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// 正規化されたX座標 (0.0〜1.0)
    pub x: f32,
    /// 正規化されたY座標 (0.0〜1.0)
    pub y: f32,
    /// 信頼度スコア (0.0〜1.0)
    #[serde(default = "full_confidence")]
    pub confidence: f32,
}

fn full_confidence() -> f32 {
    1.0
}

impl Keypoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// 信頼度が閾値以上か
    pub fn is_valid(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }

    /// ピクセル座標に変換（切り捨て）
    pub fn to_pixel(&self, width: u32, height: u32) -> PixelPoint {
        let px = (self.x * width as f32) as i32;
        let py = (self.y * height as f32) as i32;
        PixelPoint::new(px, py)
    }
}

impl Default for Keypoint {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            confidence: 0.0,
        }
    }
}

/// 外部の姿勢検出器が返した1人分の姿勢
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    #[serde(default)]
    pub layout: PoseLayout,
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    pub fn new(layout: PoseLayout, keypoints: Vec<Keypoint>) -> Self {
        Self { layout, keypoints }
    }

    /// 全て未検出の姿勢
    pub fn empty(layout: PoseLayout) -> Self {
        Self {
            layout,
            keypoints: vec![Keypoint::default(); layout.keypoint_count()],
        }
    }

    /// 名前でキーポイントを取得。検出器が返さなかった場合は None
    pub fn get(&self, index: KeypointIndex) -> Option<&Keypoint> {
        self.keypoints.get(self.layout.index_of(index))
    }

    pub fn set(&mut self, index: KeypointIndex, keypoint: Keypoint) {
        let i = self.layout.index_of(index);
        if i >= self.keypoints.len() {
            self.keypoints.resize(i + 1, Keypoint::default());
        }
        self.keypoints[i] = keypoint;
    }

    /// 閾値以上の信頼度を持つキーポイントのピクセル座標
    pub fn pixel(
        &self,
        index: KeypointIndex,
        width: u32,
        height: u32,
        threshold: f32,
    ) -> Option<PixelPoint> {
        self.get(index)
            .filter(|kp| kp.is_valid(threshold))
            .map(|kp| kp.to_pixel(width, height))
    }
}
