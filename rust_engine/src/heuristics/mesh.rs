//! 蒙皮网格与启发式上下文

use glam::Vec3;
use rayon::prelude::*;

use super::{
    AdHocSampling, PoissonDiskSampling, SampleHeuristic, SamplingConfig, SamplingContext,
    SamplingMethod,
};
use crate::config;
use crate::skeleton::SkeletonTopology;
use crate::{Result, SampleError};

/// 蒙皮网格（绑定姿态）
///
/// `clusters[i]` 为顶点 i 所属的骨骼。
#[derive(Clone, Debug, Default)]
pub struct SkinMesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    clusters: Vec<usize>,
}

impl SkinMesh {
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, clusters: Vec<usize>) -> Result<Self> {
        if positions.len() != normals.len() {
            return Err(SampleError::LengthMismatch {
                positions: positions.len(),
                normals: normals.len(),
            });
        }
        if positions.len() != clusters.len() {
            return Err(SampleError::ClusterMismatch {
                vertices: positions.len(),
                clusters: clusters.len(),
            });
        }
        Ok(Self {
            positions,
            normals,
            clusters,
        })
    }

    /// 按最近骨骼线段划分顶点
    pub fn with_nearest_bone_clusters<S>(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        skel: &S,
    ) -> Result<Self>
    where
        S: SkeletonTopology + Sync + ?Sized,
    {
        let bones: Vec<_> = (0..skel.bone_count()).map(|b| skel.get_bone(b)).collect();
        let clusters = positions
            .par_iter()
            .map(|&p| {
                bones
                    .iter()
                    .enumerate()
                    .map(|(i, b)| {
                        let t = b.project(p).clamp(0.0, 1.0);
                        (i, p.distance_squared(b.origin + b.dir * t))
                    })
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .map_or(0, |(i, _)| i)
            })
            .collect();
        Self::new(positions, normals, clusters)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn clusters(&self) -> &[usize] {
        &self.clusters
    }

    /// 属于给定骨骼集合的顶点下标
    pub fn cluster_vertices<'a>(&'a self, bones: &'a [usize]) -> impl Iterator<Item = usize> + 'a {
        self.clusters
            .iter()
            .enumerate()
            .filter(move |(_, c)| bones.contains(c))
            .map(|(i, _)| i)
    }
}

/// 网格 + 骨架，作为启发式的构造上下文
pub struct AnimatedMesh<'a, S: SkeletonTopology> {
    mesh: &'a SkinMesh,
    skel: &'a S,
    junction_band: f32,
}

impl<'a, S: SkeletonTopology> AnimatedMesh<'a, S> {
    pub fn new(mesh: &'a SkinMesh, skel: &'a S) -> Self {
        Self {
            mesh,
            skel,
            junction_band: config::get_config().junction_band,
        }
    }

    pub fn with_junction_band(mut self, band: f32) -> Self {
        self.junction_band = band;
        self
    }

    pub fn mesh(&self) -> &SkinMesh {
        self.mesh
    }
}

impl<'a, S: SkeletonTopology> SamplingContext for AnimatedMesh<'a, S> {
    fn skeleton(&self) -> &dyn SkeletonTopology {
        self.skel
    }

    fn heuristic(&self, config: SamplingConfig) -> Box<dyn SampleHeuristic + '_> {
        match config.method {
            SamplingMethod::AdHoc => Box::new(AdHocSampling::new(
                self.mesh,
                self.skel,
                config,
                self.junction_band,
            )),
            SamplingMethod::PoissonDisk { .. } => Box::new(PoissonDiskSampling::new(
                self.mesh,
                self.skel,
                config,
                self.junction_band,
            )),
        }
    }
}

/// 参与采样的骨骼：自身，或启用兄弟合并时的整组兄弟
fn sampled_bones(skel: &dyn SkeletonTopology, config: &SamplingConfig) -> Vec<usize> {
    match skel.parent(config.bone_id) {
        Some(parent) if config.factor_siblings => skel.get_sons(parent).to_vec(),
        _ => vec![config.bone_id],
    }
}

/// 通过关节与折叠过滤的候选顶点，按顶点顺序返回
pub(super) fn collect_candidates(
    mesh: &SkinMesh,
    skel: &dyn SkeletonTopology,
    config: &SamplingConfig,
    junction_band: f32,
) -> Vec<usize> {
    let bones = sampled_bones(skel, config);
    mesh.cluster_vertices(&bones)
        .filter(|&v| {
            let bone_id = mesh.clusters[v];
            let b = skel.get_bone(bone_id);
            let d = b.dir.normalize_or_zero();
            let p = mesh.positions[v];
            let n = mesh.normals[v];
            let t = b.project(p);

            if t > 1.0 - junction_band && !skel.is_leaf(bone_id) && n.dot(d) > config.jmax {
                return false;
            }
            if t < junction_band && skel.parent(bone_id).is_some() && n.dot(-d) > config.pmax {
                return false;
            }
            match b.radial(p).try_normalize() {
                Some(r) => n.dot(r) >= config.fold,
                None => true,
            }
        })
        .collect()
}

/// 估计每根骨骼的关节半径（父关节处，从本骨骼看）
///
/// 取起点关节带内顶点到骨骼轴线的平均距离；关节带内没有顶点时取整个簇的最小距离；
/// 空簇为 0。
pub fn estimate_junction_radii<S>(mesh: &SkinMesh, skel: &S, junction_band: f32) -> Vec<f32>
where
    S: SkeletonTopology + Sync + ?Sized,
{
    (0..skel.bone_count())
        .into_par_iter()
        .map(|bone_id| {
            let b = skel.get_bone(bone_id);
            let mut band_sum = 0.0f32;
            let mut band_count = 0usize;
            let mut min_dist = f32::INFINITY;
            for v in mesh.cluster_vertices(&[bone_id]) {
                let p = mesh.positions[v];
                let dist = b.radial(p).length();
                min_dist = min_dist.min(dist);
                if b.project(p) < junction_band {
                    band_sum += dist;
                    band_count += 1;
                }
            }
            if band_count > 0 {
                band_sum / band_count as f32
            } else if min_dist.is_finite() {
                min_dist
            } else {
                0.0
            }
        })
        .collect()
}
