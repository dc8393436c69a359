//! 骨骼系统：拓扑查询与姿态

mod bone;
mod manager;

pub use bone::Bone;
pub use manager::BoneManager;

use glam::{Mat4, Quat, Vec3};

/// 骨骼变换数据
#[derive(Clone, Debug)]
pub struct BoneTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl BoneTransform {
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::default()
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// 骨骼几何（当前姿态下）
///
/// `dir` 未归一化，长度即骨骼长度。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoneGeometry {
    pub origin: Vec3,
    pub end: Vec3,
    pub dir: Vec3,
}

impl BoneGeometry {
    pub fn from_segment(origin: Vec3, end: Vec3) -> Self {
        Self {
            origin,
            end,
            dir: end - origin,
        }
    }

    pub fn length(&self) -> f32 {
        self.dir.length()
    }

    /// 点在骨骼线段上的投影参数（0 = 起点，1 = 末端）
    pub fn project(&self, p: Vec3) -> f32 {
        let len2 = self.dir.length_squared();
        if len2 <= f32::EPSILON {
            return 0.0;
        }
        (p - self.origin).dot(self.dir) / len2
    }

    /// 点到骨骼轴线上投影点的向量
    pub fn radial(&self, p: Vec3) -> Vec3 {
        let t = self.project(p);
        p - (self.origin + self.dir * t)
    }
}

/// 骨架拓扑与几何查询
///
/// 所有方法都要求 `id` 是合法骨骼（先用 `is_bone` 检查），否则可能 panic。
pub trait SkeletonTopology {
    fn bone_count(&self) -> usize;

    fn is_bone(&self, id: usize) -> bool {
        id < self.bone_count()
    }

    fn is_leaf(&self, id: usize) -> bool {
        self.get_sons(id).is_empty()
    }

    fn get_bone(&self, id: usize) -> BoneGeometry;

    fn parent(&self, id: usize) -> Option<usize>;

    /// 子骨骼列表，顺序与添加顺序一致
    fn get_sons(&self, id: usize) -> &[usize];
}
