//! 骨骼节点

use glam::{Mat4, Vec3};

use super::{BoneGeometry, BoneTransform};

/// 骨骼节点
#[derive(Clone, Debug)]
pub struct Bone {
    pub name: String,
    pub parent_index: Option<usize>,

    // 初始位置（世界空间）：骨骼起点与末端
    pub initial_position: Vec3,
    pub initial_tail: Vec3,
    // 相对于父骨骼的偏移（在build_hierarchy中计算）
    pub bone_offset: Vec3,
    // 逆绑定矩阵（在build_hierarchy中计算）
    pub inverse_bind_matrix: Mat4,

    // 动画状态（相对绑定姿态）
    pub pose: BoneTransform,

    // 变换结果
    pub local_transform: Mat4,
    pub global_transform: Mat4,
}

impl Bone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_index: None,
            initial_position: Vec3::ZERO,
            initial_tail: Vec3::ZERO,
            bone_offset: Vec3::ZERO,
            inverse_bind_matrix: Mat4::IDENTITY,
            pose: BoneTransform::default(),
            local_transform: Mat4::IDENTITY,
            global_transform: Mat4::IDENTITY,
        }
    }

    /// 以起点和末端（世界空间）创建骨骼
    pub fn with_segment(name: impl Into<String>, head: Vec3, tail: Vec3) -> Self {
        let mut bone = Self::new(name);
        bone.initial_position = head;
        bone.initial_tail = tail;
        bone
    }

    pub fn with_parent(mut self, parent: usize) -> Self {
        self.parent_index = Some(parent);
        self
    }

    /// 重置动画状态
    pub fn reset_animation(&mut self) {
        self.pose = BoneTransform::default();
    }

    pub fn set_pose(&mut self, pose: &BoneTransform) {
        self.pose = pose.clone();
    }

    /// 更新本地变换：绕骨骼起点旋转，平移 = bone_offset + pose.translation
    pub fn update_local_transform(&mut self) {
        self.local_transform = Mat4::from_translation(self.bone_offset) * self.pose.to_matrix();
    }

    /// 获取蒙皮矩阵 = 当前全局变换 * 逆绑定矩阵
    pub fn get_skinning_matrix(&self) -> Mat4 {
        self.global_transform * self.inverse_bind_matrix
    }

    /// 当前姿态下的骨骼几何
    pub fn geometry(&self) -> BoneGeometry {
        let m = self.get_skinning_matrix();
        BoneGeometry::from_segment(
            m.transform_point3(self.initial_position),
            m.transform_point3(self.initial_tail),
        )
    }
}

impl Default for Bone {
    fn default() -> Self {
        Self::new(String::new())
    }
}
