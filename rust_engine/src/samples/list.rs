//! 有向采样列表

use glam::{Mat4, Vec3};

/// 单个 Hermite 采样：位置 + 法线
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HermiteSample {
    pub position: Vec3,
    pub normal: Vec3,
}

impl HermiteSample {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }

    /// 位置按点变换，法线只经过线性部分
    pub fn transformed(&self, tr: &Mat4) -> Self {
        Self {
            position: tr.transform_point3(self.position),
            normal: tr.transform_vector3(self.normal),
        }
    }
}

/// 采样列表
///
/// 以记录数组存储，位置与法线天然一一对应。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleList {
    samples: Vec<HermiteSample>,
}

impl SampleList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn push(&mut self, position: Vec3, normal: Vec3) {
        self.samples.push(HermiteSample::new(position, normal));
    }

    /// 追加另一列表的全部采样，保持顺序
    pub fn append(&mut self, other: &SampleList) {
        self.samples.extend_from_slice(&other.samples);
    }

    /// 从平行数组追加；两数组长度必须相同
    pub fn extend_from_parallel(&mut self, positions: &[Vec3], normals: &[Vec3]) {
        assert_eq!(
            positions.len(),
            normals.len(),
            "position/normal arrays must have equal length"
        );
        self.samples.extend(
            positions
                .iter()
                .zip(normals)
                .map(|(&p, &n)| HermiteSample::new(p, n)),
        );
    }

    /// 删除下标处的采样；越界时 panic
    pub fn remove(&mut self, index: usize) -> HermiteSample {
        self.samples.remove(index)
    }

    pub fn get(&self, index: usize) -> Option<&HermiteSample> {
        self.samples.get(index)
    }

    pub fn as_slice(&self) -> &[HermiteSample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HermiteSample> {
        self.samples.iter()
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.samples.iter().map(|s| s.position)
    }

    pub fn normals(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.samples.iter().map(|s| s.normal)
    }

    /// 拆分为平行数组（供 HRBF 拟合使用）
    pub fn to_parallel(&self) -> (Vec<Vec3>, Vec<Vec3>) {
        self.samples.iter().map(|s| (s.position, s.normal)).unzip()
    }

    /// 原地变换全部采样
    pub fn transform(&mut self, tr: &Mat4) {
        for sample in &mut self.samples {
            *sample = sample.transformed(tr);
        }
    }
}

impl<'a> IntoIterator for &'a SampleList {
    type Item = &'a HermiteSample;
    type IntoIter = std::slice::Iter<'a, HermiteSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl FromIterator<HermiteSample> for SampleList {
    fn from_iter<I: IntoIterator<Item = HermiteSample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}
