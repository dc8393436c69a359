//! 采样默认参数
//!
//! 所有参数扁平化，直接在代码中修改默认值即可。
//! 全局实例只在构造时读取（`SampleSet::from_defaults` 等），
//! 运行中的编排操作只使用 `SampleSet` 自身的字段。

use once_cell::sync::Lazy;
use std::sync::RwLock;

/// 采样默认参数（扁平化，不嵌套）
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingDefaults {
    // ========== 兄弟骨骼 ==========
    /// 共享同一父关节的兄弟骨骼是否合并为一个隐式曲面，默认 false
    pub factor_bones: bool,

    // ========== 封口 ==========
    /// 新建骨骼记录时是否启用关节端封口，默认 true
    pub jcap_enabled: bool,
    /// 新建骨骼记录时是否启用父端封口，默认 true
    pub pcap_enabled: bool,

    // ========== 启发式参数 ==========
    /// 关节端最大法线夹角（余弦阈值），默认 0.5
    pub jmax: f32,
    /// 父端最大法线夹角（余弦阈值），默认 0.5
    pub pmax: f32,
    /// 采样最小间距，默认 0.0（不限制）
    pub min_dist: f32,
    /// 折叠检测阈值，默认 0.0
    /// 法线与径向夹角余弦小于此值的顶点被丢弃
    pub fold: f32,
    /// Poisson 采样目标数量，默认 50
    pub nb_samples: usize,

    // ========== 关节区域 ==========
    /// 骨骼两端的关节带宽度（占骨骼长度比例），默认 0.15
    /// 用于启发式的关节过滤和关节半径估计
    pub junction_band: f32,
}

impl Default for SamplingDefaults {
    fn default() -> Self {
        Self {
            factor_bones: false,
            jcap_enabled: true,
            pcap_enabled: true,
            jmax: 0.5,
            pmax: 0.5,
            min_dist: 0.0,
            fold: 0.0,
            nb_samples: 50,
            junction_band: 0.15,
        }
    }
}

/// 全局配置实例
static SAMPLING_DEFAULTS: Lazy<RwLock<SamplingDefaults>> =
    Lazy::new(|| RwLock::new(SamplingDefaults::default()));

/// 获取当前配置（只读）
pub fn get_config() -> SamplingDefaults {
    match SAMPLING_DEFAULTS.read() {
        Ok(config) => config.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// 手动设置配置
pub fn set_config(config: SamplingDefaults) {
    match SAMPLING_DEFAULTS.write() {
        Ok(mut guard) => *guard = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// 重置为默认配置
pub fn reset_config() {
    set_config(SamplingDefaults::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    // 只读测试：全局配置会被其他测试线程共享，这里不修改它
    #[test]
    fn test_defaults() {
        let config = SamplingDefaults::default();
        assert!(!config.factor_bones);
        assert!(config.jcap_enabled && config.pcap_enabled);
        assert_eq!(config.nb_samples, 50);
        assert!((config.junction_band - 0.15).abs() < 1e-6);
    }
}
