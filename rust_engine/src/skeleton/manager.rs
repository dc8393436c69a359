//! 骨骼管理器

use glam::Mat4;
use std::collections::HashMap;

use super::{Bone, BoneGeometry, BoneTransform, SkeletonTopology};
use crate::{Result, SampleError};

/// 骨骼管理器
///
/// 骨骼 id 即添加顺序；父骨骼必须先于子骨骼添加，因此按 id 顺序遍历即为层级顺序。
pub struct BoneManager {
    bones: Vec<Bone>,
    name_to_index: HashMap<String, usize>,
    children: Vec<Vec<usize>>,
    skinning_matrices: Vec<Mat4>,
}

impl BoneManager {
    pub fn new() -> Self {
        Self {
            bones: Vec::new(),
            name_to_index: HashMap::new(),
            children: Vec::new(),
            skinning_matrices: Vec::new(),
        }
    }

    /// 添加骨骼，返回骨骼 id
    pub fn add_bone(&mut self, bone: Bone) -> Result<usize> {
        let index = self.bones.len();
        if let Some(parent) = bone.parent_index {
            if parent >= index {
                return Err(SampleError::InvalidParent { bone: index, parent });
            }
            self.children[parent].push(index);
        }
        self.name_to_index.insert(bone.name.clone(), index);
        self.bones.push(bone);
        self.children.push(Vec::new());
        self.skinning_matrices.push(Mat4::IDENTITY);
        Ok(index)
    }

    /// 构建骨骼层级并计算逆绑定矩阵
    pub fn build_hierarchy(&mut self) {
        let bone_count = self.bones.len();
        if bone_count == 0 {
            return;
        }

        for i in 0..bone_count {
            let pos = self.bones[i].initial_position;

            // 1. 计算相对于父骨骼的偏移（用于本地变换）
            let offset = match self.bones[i].parent_index {
                Some(parent) => pos - self.bones[parent].initial_position,
                None => pos,
            };
            self.bones[i].bone_offset = offset;

            // 2. 初始全局变换直接从世界坐标创建，逆绑定矩阵 = inverse(初始全局变换)
            let init_global = Mat4::from_translation(pos);
            self.bones[i].global_transform = init_global;
            self.bones[i].inverse_bind_matrix = init_global.inverse();

            // 3. 本地变换使用偏移
            self.bones[i].local_transform = Mat4::from_translation(offset);
        }

        // 初始状态下：skinning_matrix = global * inverse_bind = I
        for i in 0..bone_count {
            self.skinning_matrices[i] = self.bones[i].get_skinning_matrix();
        }

        log::info!(
            "骨骼层级构建完成: {} 个骨骼, {} 个根骨骼",
            bone_count,
            self.bones.iter().filter(|b| b.parent_index.is_none()).count()
        );
    }

    /// 通过名称查找骨骼
    pub fn find_bone_by_name(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// 获取骨骼
    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    /// 重置所有骨骼变换
    pub fn reset_all_transforms(&mut self) {
        for bone in &mut self.bones {
            bone.reset_animation();
        }
    }

    /// 设置骨骼姿态（需随后调用 update_transforms）
    pub fn set_local_pose(&mut self, index: usize, pose: &BoneTransform) -> Result<()> {
        let bone = self
            .bones
            .get_mut(index)
            .ok_or(SampleError::InvalidBone(index))?;
        bone.set_pose(pose);
        Ok(())
    }

    /// 更新骨骼变换并刷新蒙皮矩阵
    pub fn update_transforms(&mut self) {
        for idx in 0..self.bones.len() {
            self.bones[idx].update_local_transform();
            let global = match self.bones[idx].parent_index {
                Some(parent) => self.bones[parent].global_transform * self.bones[idx].local_transform,
                None => self.bones[idx].local_transform,
            };
            self.bones[idx].global_transform = global;
            self.skinning_matrices[idx] = self.bones[idx].get_skinning_matrix();
        }
    }

    /// 获取全局变换
    pub fn get_global_transform(&self, index: usize) -> Mat4 {
        self.bones.get(index).map(|b| b.global_transform).unwrap_or(Mat4::IDENTITY)
    }

    /// 获取蒙皮矩阵数组（绑定姿态 -> 当前姿态）
    pub fn skinning_matrices(&self) -> &[Mat4] {
        &self.skinning_matrices
    }
}

impl Default for BoneManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SkeletonTopology for BoneManager {
    fn bone_count(&self) -> usize {
        self.bones.len()
    }

    fn get_bone(&self, id: usize) -> BoneGeometry {
        self.bones[id].geometry()
    }

    fn parent(&self, id: usize) -> Option<usize> {
        self.bones[id].parent_index
    }

    fn get_sons(&self, id: usize) -> &[usize] {
        &self.children[id]
    }
}
