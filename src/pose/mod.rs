pub mod keypoint;
pub mod landmarks;

pub use keypoint::{Keypoint, KeypointIndex, Pose, PoseLayout};
pub use landmarks::{ArmLandmarks, ArmSegment, HeightLandmarks};
