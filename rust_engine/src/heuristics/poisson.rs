//! Poisson 盘采样：在候选顶点上做最远点选择
//!
//! 每次选取离已选集合最远的候选，直到达到目标数量，
//! 或最远距离已小于 `min_dist`。

use rayon::prelude::*;

use super::mesh::collect_candidates;
use super::{SampleHeuristic, SamplingConfig, SamplingMethod, SkinMesh};
use crate::samples::SampleList;
use crate::skeleton::SkeletonTopology;

pub struct PoissonDiskSampling<'a> {
    mesh: &'a SkinMesh,
    skel: &'a dyn SkeletonTopology,
    config: SamplingConfig,
    junction_band: f32,
}

impl<'a> PoissonDiskSampling<'a> {
    pub fn new(
        mesh: &'a SkinMesh,
        skel: &'a dyn SkeletonTopology,
        config: SamplingConfig,
        junction_band: f32,
    ) -> Self {
        Self {
            mesh,
            skel,
            config,
            junction_band,
        }
    }

    fn nb_samples(&self) -> usize {
        match self.config.method {
            SamplingMethod::PoissonDisk { nb_samples } => nb_samples,
            SamplingMethod::AdHoc => usize::MAX,
        }
    }
}

impl SampleHeuristic for PoissonDiskSampling<'_> {
    fn config(&self) -> &SamplingConfig {
        &self.config
    }

    fn sample(&self, out: &mut SampleList) {
        let target = self.nb_samples();
        let candidates = collect_candidates(self.mesh, self.skel, &self.config, self.junction_band);
        if candidates.is_empty() || target == 0 {
            return;
        }

        let positions = self.mesh.positions();
        let normals = self.mesh.normals();
        let points: Vec<_> = candidates.iter().map(|&v| positions[v]).collect();

        // dist[i]: 候选 i 到已选集合的最近距离
        let first = points[0];
        let mut dist: Vec<f32> = points.par_iter().map(|p| p.distance(first)).collect();
        out.push(first, normals[candidates[0]]);
        let mut taken = 1;

        while taken < target {
            let Some((best, best_dist)) = dist
                .iter()
                .copied()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(&b.1))
            else {
                break;
            };
            if best_dist <= 0.0 || best_dist < self.config.min_dist {
                break;
            }

            let chosen = points[best];
            out.push(chosen, normals[candidates[best]]);
            taken += 1;

            dist.par_iter_mut()
                .zip(points.par_iter())
                .for_each(|(d, p)| *d = d.min(p.distance(chosen)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use glam::Vec3;

    #[test]
    fn test_respects_sample_count() {
        let skel = fixtures::chain();
        let mesh = fixtures::cylinder_mesh(&skel, 0.2);
        let config = SamplingConfig::poisson(0, 1.0, 1.0, 0.0, 7, -1.0);
        let heur = PoissonDiskSampling::new(&mesh, &skel, config, 0.15);

        let mut out = SampleList::new();
        heur.sample(&mut out);
        assert_eq!(out.len(), 7);
    }

    #[test]
    fn test_count_larger_than_candidates() {
        let skel = fixtures::chain();
        let mesh = fixtures::cylinder_mesh(&skel, 0.2);
        let config = SamplingConfig::poisson(0, 1.0, 1.0, 0.0, 10_000, -1.0);
        let heur = PoissonDiskSampling::new(&mesh, &skel, config, 0.15);

        let mut out = SampleList::new();
        heur.sample(&mut out);
        assert_eq!(out.len(), mesh.cluster_vertices(&[0]).count());
    }

    #[test]
    fn test_min_dist_stops_selection() {
        let skel = fixtures::chain();
        let mesh = fixtures::cylinder_mesh(&skel, 0.2);
        let config = SamplingConfig::poisson(0, 1.0, 1.0, 0.35, 10_000, -1.0);
        let heur = PoissonDiskSampling::new(&mesh, &skel, config, 0.15);

        let mut out = SampleList::new();
        heur.sample(&mut out);
        let pts: Vec<Vec3> = out.positions().collect();
        assert!(pts.len() > 1);
        for (i, a) in pts.iter().enumerate() {
            for b in &pts[i + 1..] {
                assert!(a.distance(*b) >= 0.35 - 1e-6);
            }
        }
    }

    #[test]
    fn test_zero_sample_count() {
        let skel = fixtures::chain();
        let mesh = fixtures::cylinder_mesh(&skel, 0.2);
        let config = SamplingConfig::poisson(0, 1.0, 1.0, 0.0, 0, -1.0);
        let mut out = SampleList::new();
        PoissonDiskSampling::new(&mesh, &skel, config, 0.15).sample(&mut out);
        assert!(out.is_empty());
    }
}
