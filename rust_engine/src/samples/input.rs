//! 单根骨骼的采样记录

use glam::{Mat4, Vec3};

use super::{HermiteSample, SampleList};
use crate::{Result, SampleError};

/// 封口记录
///
/// 禁用时 `samples` 中的数据可能已过期，不应读取。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CapRecord {
    pub enabled: bool,
    pub samples: SampleList,
}

impl CapRecord {
    /// 启用时返回封口采样
    pub fn active(&self) -> Option<&SampleList> {
        self.enabled.then_some(&self.samples)
    }

    /// 启用时的采样数，禁用为 0
    pub fn active_len(&self) -> usize {
        self.active().map_or(0, SampleList::len)
    }
}

/// 单根骨骼的输入采样
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputSample {
    /// 启发式生成或手动添加的基础采样
    pub sample_list: SampleList,
    /// 关节端封口（骨骼末端）
    pub jcap: CapRecord,
    /// 父端封口（骨骼起点）
    pub pcap: CapRecord,
    /// 骨骼末端关节封口圆盘半径，父骨骼计算关节封口时读取
    pub junction_radius: f32,
}

impl InputSample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_caps(jcap: bool, pcap: bool) -> Self {
        let mut input = Self::default();
        input.set_jcap(jcap);
        input.set_pcap(pcap);
        input
    }

    /// 只切换标志，不改动已存的采样
    pub fn set_jcap(&mut self, state: bool) {
        self.jcap.enabled = state;
    }

    pub fn set_pcap(&mut self, state: bool) {
        self.pcap.enabled = state;
    }

    pub fn len(&self) -> usize {
        self.sample_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sample_list.is_empty()
    }

    /// 添加一个采样，返回其下标
    pub fn add_sample(&mut self, p: Vec3, n: Vec3) -> usize {
        self.sample_list.push(p, n);
        self.sample_list.len() - 1
    }

    /// 批量添加；`p` 与 `n` 长度必须相同，否则 panic
    pub fn add_samples(&mut self, p: &[Vec3], n: &[Vec3]) {
        debug_assert_eq!(p.len(), n.len());
        self.sample_list.extend_from_parallel(p, n);
    }

    pub fn try_add_samples(&mut self, p: &[Vec3], n: &[Vec3]) -> Result<()> {
        if p.len() != n.len() {
            return Err(SampleError::LengthMismatch {
                positions: p.len(),
                normals: n.len(),
            });
        }
        self.sample_list.extend_from_parallel(p, n);
        Ok(())
    }

    /// 删除下标处的采样；越界时 panic
    pub fn delete_sample(&mut self, idx: usize) {
        debug_assert!(idx < self.sample_list.len());
        self.sample_list.remove(idx);
    }

    pub fn try_delete_sample(&mut self, idx: usize) -> Result<HermiteSample> {
        let len = self.sample_list.len();
        if idx >= len {
            return Err(SampleError::IndexOutOfRange { index: idx, len });
        }
        Ok(self.sample_list.remove(idx))
    }

    /// 清空基础采样，封口不变
    pub fn clear(&mut self) {
        self.sample_list.clear();
    }

    /// 变换基础采样和已启用的封口
    pub fn transform(&mut self, tr: &Mat4) {
        self.sample_list.transform(tr);
        self.transform_caps(tr);
    }

    /// 只变换已启用的封口；禁用的封口数据保持原样
    pub fn transform_caps(&mut self, tr: &Mat4) {
        if self.jcap.enabled {
            self.jcap.samples.transform(tr);
        }
        if self.pcap.enabled {
            self.pcap.samples.transform(tr);
        }
    }
}
