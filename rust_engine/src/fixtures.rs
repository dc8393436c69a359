//! 测试用骨架与网格

use std::cell::RefCell;
use std::f32::consts::TAU;

use glam::Vec3;

use crate::heuristics::{SampleHeuristic, SamplingConfig, SamplingContext, SkinMesh};
use crate::samples::SampleList;
use crate::skeleton::{Bone, BoneManager, SkeletonTopology};

/// A(0) -> B(1)，沿 +Y
pub fn chain() -> BoneManager {
    let mut skel = BoneManager::new();
    let a = skel
        .add_bone(Bone::with_segment("a", Vec3::ZERO, Vec3::Y))
        .unwrap();
    skel.add_bone(Bone::with_segment("b", Vec3::Y, Vec3::Y * 2.0).with_parent(a))
        .unwrap();
    skel.build_hierarchy();
    skel
}

/// P(0) 下有两个兄弟 S1(1)、S2(2)
pub fn fork() -> BoneManager {
    let mut skel = BoneManager::new();
    let p = skel
        .add_bone(Bone::with_segment("p", Vec3::ZERO, Vec3::Y))
        .unwrap();
    skel.add_bone(Bone::with_segment("s1", Vec3::Y, Vec3::new(1.0, 2.0, 0.0)).with_parent(p))
        .unwrap();
    skel.add_bone(Bone::with_segment("s2", Vec3::Y, Vec3::new(-1.0, 2.0, 0.0)).with_parent(p))
        .unwrap();
    skel.build_hierarchy();
    skel
}

/// 每根骨骼外套一个圆柱：5 圈 × 8 个顶点，法线沿径向朝外
pub fn cylinder_mesh(skel: &BoneManager, radius: f32) -> SkinMesh {
    const RINGS: [f32; 5] = [0.05, 0.3, 0.5, 0.7, 0.95];
    const SEGMENTS: usize = 8;

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut clusters = Vec::new();
    for bone_id in 0..skel.bone_count() {
        let b = skel.get_bone(bone_id);
        let (u, v) = b.dir.normalize().any_orthonormal_pair();
        for t in RINGS {
            for k in 0..SEGMENTS {
                let angle = k as f32 * TAU / SEGMENTS as f32;
                let r = u * angle.cos() + v * angle.sin();
                positions.push(b.origin + b.dir * t + r * radius);
                normals.push(r);
                clusters.push(bone_id);
            }
        }
    }
    SkinMesh::new(positions, normals, clusters).unwrap()
}

/// 固定输出的启发式，记录收到的配置
pub struct FixedContext {
    pub skel: BoneManager,
    pub output: SampleList,
    pub seen: RefCell<Vec<SamplingConfig>>,
}

impl FixedContext {
    pub fn new(skel: BoneManager, output: SampleList) -> Self {
        Self {
            skel,
            output,
            seen: RefCell::new(Vec::new()),
        }
    }
}

struct FixedHeuristic<'a> {
    config: SamplingConfig,
    output: &'a SampleList,
}

impl SampleHeuristic for FixedHeuristic<'_> {
    fn config(&self) -> &SamplingConfig {
        &self.config
    }

    fn sample(&self, out: &mut SampleList) {
        out.append(self.output);
    }
}

impl SamplingContext for FixedContext {
    fn skeleton(&self) -> &dyn SkeletonTopology {
        &self.skel
    }

    fn heuristic(&self, config: SamplingConfig) -> Box<dyn SampleHeuristic + '_> {
        self.seen.borrow_mut().push(config);
        Box::new(FixedHeuristic {
            config,
            output: &self.output,
        })
    }
}
