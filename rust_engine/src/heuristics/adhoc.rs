//! Ad-hoc 采样：按顶点顺序贪心接受候选顶点

use glam::Vec3;

use super::mesh::collect_candidates;
use super::{SampleHeuristic, SamplingConfig, SkinMesh};
use crate::samples::SampleList;
use crate::skeleton::SkeletonTopology;

pub struct AdHocSampling<'a> {
    mesh: &'a SkinMesh,
    skel: &'a dyn SkeletonTopology,
    config: SamplingConfig,
    junction_band: f32,
}

impl<'a> AdHocSampling<'a> {
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
}

impl SampleHeuristic for AdHocSampling<'_> {
    fn config(&self) -> &SamplingConfig {
        &self.config
    }

    fn sample(&self, out: &mut SampleList) {
        let candidates = collect_candidates(self.mesh, self.skel, &self.config, self.junction_band);
        let min_dist2 = self.config.min_dist * self.config.min_dist;
        let positions = self.mesh.positions();
        let normals = self.mesh.normals();

        let mut accepted: Vec<Vec3> = Vec::with_capacity(candidates.len());
        for v in candidates {
            let p = positions[v];
            if self.config.min_dist > 0.0 && accepted.iter().any(|a| a.distance_squared(p) < min_dist2) {
                continue;
            }
            accepted.push(p);
            out.push(p, normals[v]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_takes_all_candidates_without_spacing() {
        let skel = fixtures::chain();
        let mesh = fixtures::cylinder_mesh(&skel, 0.2);
        let config = SamplingConfig::adhoc(0, 1.0, 1.0, 0.0, -1.0);
        let heur = AdHocSampling::new(&mesh, &skel, config, 0.15);

        let mut out = SampleList::new();
        heur.sample(&mut out);
        assert_eq!(out.len(), mesh.cluster_vertices(&[0]).count());
    }

    #[test]
    fn test_min_dist_spacing() {
        let skel = fixtures::chain();
        let mesh = fixtures::cylinder_mesh(&skel, 0.2);
        let config = SamplingConfig::adhoc(0, 1.0, 1.0, 0.3, -1.0);
        let heur = AdHocSampling::new(&mesh, &skel, config, 0.15);

        let mut out = SampleList::new();
        heur.sample(&mut out);
        assert!(!out.is_empty());
        let pts: Vec<Vec3> = out.positions().collect();
        for (i, a) in pts.iter().enumerate() {
            for b in &pts[i + 1..] {
                assert!(a.distance(*b) >= 0.3 - 1e-6);
            }
        }
    }

    #[test]
    fn test_appends_without_clearing() {
        let skel = fixtures::chain();
        let mesh = fixtures::cylinder_mesh(&skel, 0.2);
        let config = SamplingConfig::adhoc(1, 1.0, 1.0, 0.0, -1.0);
        let heur = AdHocSampling::new(&mesh, &skel, config, 0.15);

        let mut out = SampleList::new();
        out.push(Vec3::splat(9.0), Vec3::X);
        heur.sample(&mut out);
        assert_eq!(out.get(0).unwrap().position, Vec3::splat(9.0));
        assert!(out.len() > 1);
    }
}
