//! 采样集合：按骨骼管理 HRBF 输入采样

use glam::Mat4;
use rayon::prelude::*;

use super::caps::{compute_jcap, compute_pcap, resolve_canonical_bone};
use super::{InputSample, SampleList};
use crate::config;
use crate::heuristics::{SamplingConfig, SamplingContext};
use crate::skeleton::SkeletonTopology;
use crate::{Result, SampleError};

/// 采样集合
///
/// 每根骨骼一条 `InputSample` 记录，下标即骨骼 id。
/// `factor_bones` 为真时，同一父关节下的兄弟骨骼共享一个隐式曲面，
/// 基础采样和父端封口存放在第一个兄弟的记录上。
#[derive(Clone, Debug, Default)]
pub struct SampleSet {
    samples: Vec<InputSample>,
    factor_bones: bool,
}

impl SampleSet {
    /// 创建空记录（封口均未启用）
    pub fn new(nb_bones: usize, factor_bones: bool) -> Self {
        Self {
            samples: vec![InputSample::default(); nb_bones],
            factor_bones,
        }
    }

    /// 使用全局默认参数创建
    pub fn from_defaults(nb_bones: usize) -> Self {
        let mut set = Self::new(0, config::get_config().factor_bones);
        set.reset(nb_bones);
        set
    }

    /// 绑定骨架：按骨骼数量重建默认记录
    pub fn bind_skeleton<S: SkeletonTopology + ?Sized>(&mut self, skel: &S) {
        self.reset(skel.bone_count());
        log::info!(
            "采样集合绑定骨架: {} 个骨骼, factor_bones={}",
            self.samples.len(),
            self.factor_bones
        );
    }

    fn reset(&mut self, nb_bones: usize) {
        let defaults = config::get_config();
        self.samples = vec![InputSample::with_caps(defaults.jcap_enabled, defaults.pcap_enabled); nb_bones];
    }

    pub fn bone_count(&self) -> usize {
        self.samples.len()
    }

    pub fn factor_bones(&self) -> bool {
        self.factor_bones
    }

    pub fn set_factor_bones(&mut self, factor_bones: bool) {
        self.factor_bones = factor_bones;
    }

    /// 骨骼记录；`bone_id` 越界时 panic
    pub fn input(&self, bone_id: usize) -> &InputSample {
        &self.samples[bone_id]
    }

    pub fn input_mut(&mut self, bone_id: usize) -> &mut InputSample {
        &mut self.samples[bone_id]
    }

    pub fn try_input(&self, bone_id: usize) -> Result<&InputSample> {
        self.samples.get(bone_id).ok_or(SampleError::InvalidBone(bone_id))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InputSample> {
        self.samples.iter()
    }

    pub fn set_junction_radius(&mut self, bone_id: usize, radius: f32) {
        self.samples[bone_id].junction_radius = radius;
    }

    /// 一次写入全部关节半径；必须在计算封口之前完成
    pub fn set_junction_radii(&mut self, radii: &[f32]) -> Result<()> {
        if radii.len() != self.samples.len() {
            return Err(SampleError::BoneCountMismatch {
                expected: self.samples.len(),
                got: radii.len(),
            });
        }
        for (input, &r) in self.samples.iter_mut().zip(radii) {
            input.junction_radius = r;
        }
        Ok(())
    }

    /// 清空全部基础采样与封口采样
    pub fn clear_all(&mut self) {
        for input in &mut self.samples {
            input.clear();
            input.jcap.samples.clear();
            input.pcap.samples.clear();
        }
    }

    // ========== 采样 ==========

    /// Ad-hoc 启发式重新采样；骨骼非法时什么都不做。不会更新封口。
    pub fn choose_samples_adhoc<C: SamplingContext + ?Sized>(
        &mut self,
        ctx: &C,
        bone_id: usize,
        jmax: f32,
        pmax: f32,
        min_dist: f32,
        fold: f32,
    ) {
        self.choose_samples(ctx, SamplingConfig::adhoc(bone_id, jmax, pmax, min_dist, fold));
    }

    /// Poisson 盘启发式重新采样；骨骼非法时什么都不做。不会更新封口。
    #[allow(clippy::too_many_arguments)]
    pub fn choose_samples_poisson<C: SamplingContext + ?Sized>(
        &mut self,
        ctx: &C,
        bone_id: usize,
        jmax: f32,
        pmax: f32,
        min_dist: f32,
        nb_samples: usize,
        fold: f32,
    ) {
        self.choose_samples(
            ctx,
            SamplingConfig::poisson(bone_id, jmax, pmax, min_dist, nb_samples, fold),
        );
    }

    /// 用给定配置重新采样，兄弟合并策略取自本集合
    pub fn choose_samples<C: SamplingContext + ?Sized>(&mut self, ctx: &C, config: SamplingConfig) {
        let bone_id = config.bone_id;
        if !ctx.skeleton().is_bone(bone_id) || bone_id >= self.samples.len() {
            log::debug!("忽略非法骨骼 {} 的采样请求", bone_id);
            return;
        }

        let heur = ctx.heuristic(config.with_factor_siblings(self.factor_bones));

        let list = &mut self.samples[bone_id].sample_list;
        list.clear();
        heur.sample(list);

        log::debug!(
            "骨骼 {} 重新采样 ({:?}): {} 个采样",
            bone_id,
            config.method,
            list.len()
        );
    }

    // ========== 封口 ==========

    /// 重新计算骨骼的关节端 / 父端封口
    ///
    /// 父端封口先做兄弟解析：启用合并时写入第一个兄弟的记录。
    pub fn update_caps<S: SkeletonTopology + ?Sized>(
        &mut self,
        skel: &S,
        bone_id: usize,
        do_jcap: bool,
        do_pcap: bool,
    ) {
        if do_jcap {
            let mut jcap = std::mem::take(&mut self.samples[bone_id].jcap.samples);
            jcap.clear();
            compute_jcap(skel, bone_id, |c| self.samples[c].junction_radius, &mut jcap);
            self.samples[bone_id].jcap.samples = jcap;
        }

        if do_pcap {
            let group = resolve_canonical_bone(skel, bone_id, self.factor_bones);
            let target = &mut self.samples[group.canonical];
            target.pcap.samples.clear();
            compute_pcap(
                skel,
                group.canonical,
                target.junction_radius,
                group.use_parent_dir,
                &mut target.pcap.samples,
            );
            log::trace!(
                "骨骼 {} 父端封口写入 {} (use_parent_dir={})",
                bone_id,
                group.canonical,
                group.use_parent_dir
            );
        }
    }

    /// 按 id 顺序更新全部骨骼的封口
    ///
    /// 关节半径必须已全部写入。
    pub fn update_all_caps<S: SkeletonTopology + ?Sized>(&mut self, skel: &S, do_jcap: bool, do_pcap: bool) {
        let nb_bones = self.samples.len().min(skel.bone_count());
        for bone_id in 0..nb_bones {
            self.update_caps(skel, bone_id, do_jcap, do_pcap);
        }
        log::debug!("更新 {} 个骨骼的封口 (jcap={}, pcap={})", nb_bones, do_jcap, do_pcap);
    }

    // ========== 姿态变换 ==========

    /// 把缓存的采样变换到新姿态
    ///
    /// `bone_ids` 为空时处理全部骨骼（并行），否则按给定顺序处理。
    /// `transforms` 以骨骼 id 为下标，位置按点变换，法线只经过线性部分。
    pub fn transform_samples(&mut self, transforms: &[Mat4], bone_ids: &[usize]) {
        if bone_ids.is_empty() {
            assert!(
                transforms.len() >= self.samples.len(),
                "expected {} transforms, got {}",
                self.samples.len(),
                transforms.len()
            );
            self.samples
                .par_iter_mut()
                .zip(transforms.par_iter())
                .for_each(|(input, tr)| input.transform(tr));
            log::debug!("变换全部 {} 个骨骼的采样", self.samples.len());
        } else {
            for &bone_id in bone_ids {
                self.samples[bone_id].transform(&transforms[bone_id]);
            }
            log::debug!("变换 {} 个骨骼的采样", bone_ids.len());
        }
    }

    /// 只变换骨骼已启用的封口
    pub fn transform_caps(&mut self, bone_id: usize, tr: &Mat4) {
        self.samples[bone_id].transform_caps(tr);
    }

    // ========== 聚合 ==========

    /// 收集骨骼拟合 HRBF 所需的全部采样，返回规范骨骼 id
    ///
    /// 顺序：规范骨骼的基础采样，组内每个兄弟已启用的关节端封口，
    /// 规范骨骼已启用的父端封口。
    pub fn get_all_bone_samples<S: SkeletonTopology + ?Sized>(
        &self,
        skel: &S,
        bone_id: usize,
        out: &mut SampleList,
    ) -> usize {
        let group = resolve_canonical_bone(skel, bone_id, self.factor_bones);
        let canonical = &self.samples[group.canonical];

        out.append(&canonical.sample_list);

        for &sibling in &group.siblings {
            if let Some(jcap) = self.samples[sibling].jcap.active() {
                out.append(jcap);
            }
        }

        if let Some(pcap) = canonical.pcap.active() {
            out.append(pcap);
        }

        group.canonical
    }

    pub fn all_bone_samples<S: SkeletonTopology + ?Sized>(&self, skel: &S, bone_id: usize) -> (SampleList, usize) {
        let mut out = SampleList::new();
        let canonical = self.get_all_bone_samples(skel, bone_id, &mut out);
        (out, canonical)
    }

    /// 全部骨骼的基础采样总数（不含封口）
    pub fn compute_nb_samples(&self) -> usize {
        self.samples.iter().map(InputSample::len).sum()
    }
}
