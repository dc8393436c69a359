//! HRBF 隐式蒙皮采样管理
//!
//! 为每根骨骼维护用于拟合 HRBF 隐式曲面的有向采样点（位置 + 法线）：
//! - 通过可插拔的启发式算法生成采样
//! - 合成关节端 / 父端封口采样（joint cap / parent cap）
//! - 随姿态变换缓存的采样，无需重新采样
//! - 兄弟骨骼共享同一隐式曲面时的采样聚合

pub mod config;
pub mod heuristics;
pub mod samples;
pub mod skeleton;

#[cfg(test)]
mod fixtures;

pub use config::SamplingDefaults;
pub use heuristics::{
    AdHocSampling, AnimatedMesh, PoissonDiskSampling, SampleHeuristic, SamplingConfig,
    SamplingContext, SamplingMethod, SkinMesh,
};
pub use samples::{CapRecord, HermiteSample, InputSample, SampleList, SampleSet, SiblingGroup};
pub use skeleton::{Bone, BoneGeometry, BoneManager, BoneTransform, SkeletonTopology};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SampleError {
    #[error("Invalid bone id: {0}")]
    InvalidBone(usize),

    #[error("Bone {bone} references parent {parent} which has not been added")]
    InvalidParent { bone: usize, parent: usize },

    #[error("Sample index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Position/normal count mismatch: {positions} positions, {normals} normals")]
    LengthMismatch { positions: usize, normals: usize },

    #[error("Mesh has {vertices} vertices but {clusters} cluster entries")]
    ClusterMismatch { vertices: usize, clusters: usize },

    #[error("Expected {expected} per-bone values, got {got}")]
    BoneCountMismatch { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, SampleError>;
