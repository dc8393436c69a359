//! 采样启发式
//!
//! `SampleSet` 只通过 `SamplingContext` / `SampleHeuristic` 使用启发式：
//! 先由上下文根据 `SamplingConfig` 构造启发式，再调用 `sample` 追加采样。

mod adhoc;
mod mesh;
mod poisson;

pub use adhoc::AdHocSampling;
pub use mesh::{estimate_junction_radii, AnimatedMesh, SkinMesh};
pub use poisson::PoissonDiskSampling;

use crate::config;
use crate::samples::SampleList;
use crate::skeleton::SkeletonTopology;

/// 启发式类型及其专属参数
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplingMethod {
    AdHoc,
    PoissonDisk { nb_samples: usize },
}

/// 启发式构造参数
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplingConfig {
    pub bone_id: usize,
    /// 关节端最大法线夹角（余弦阈值）
    pub jmax: f32,
    /// 父端最大法线夹角（余弦阈值）
    pub pmax: f32,
    /// 采样最小间距
    pub min_dist: f32,
    /// 折叠检测阈值
    pub fold: f32,
    pub method: SamplingMethod,
    /// 是否把兄弟骨骼的顶点一起采样
    pub factor_siblings: bool,
}

impl SamplingConfig {
    pub fn adhoc(bone_id: usize, jmax: f32, pmax: f32, min_dist: f32, fold: f32) -> Self {
        Self {
            bone_id,
            jmax,
            pmax,
            min_dist,
            fold,
            method: SamplingMethod::AdHoc,
            factor_siblings: false,
        }
    }

    pub fn poisson(
        bone_id: usize,
        jmax: f32,
        pmax: f32,
        min_dist: f32,
        nb_samples: usize,
        fold: f32,
    ) -> Self {
        Self {
            method: SamplingMethod::PoissonDisk { nb_samples },
            ..Self::adhoc(bone_id, jmax, pmax, min_dist, fold)
        }
    }

    /// 使用全局默认参数
    pub fn adhoc_from_defaults(bone_id: usize) -> Self {
        let d = config::get_config();
        Self::adhoc(bone_id, d.jmax, d.pmax, d.min_dist, d.fold).with_factor_siblings(d.factor_bones)
    }

    pub fn poisson_from_defaults(bone_id: usize) -> Self {
        let d = config::get_config();
        Self::poisson(bone_id, d.jmax, d.pmax, d.min_dist, d.nb_samples, d.fold)
            .with_factor_siblings(d.factor_bones)
    }

    pub fn with_factor_siblings(mut self, factor_siblings: bool) -> Self {
        self.factor_siblings = factor_siblings;
        self
    }
}

/// 采样启发式
pub trait SampleHeuristic {
    fn config(&self) -> &SamplingConfig;

    /// 把选中的采样追加到 `out`（不清空）
    fn sample(&self, out: &mut SampleList);
}

/// 启发式构造上下文（绑定网格与骨架）
pub trait SamplingContext {
    fn skeleton(&self) -> &dyn SkeletonTopology;

    fn heuristic(&self, config: SamplingConfig) -> Box<dyn SampleHeuristic + '_>;
}
