//! 封口采样合成与兄弟骨骼解析
//!
//! 这里全部是纯函数：只读骨架拓扑与关节半径，结果写入调用方给出的列表。

use super::SampleList;
use crate::skeleton::SkeletonTopology;

/// 兄弟骨骼解析结果
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiblingGroup {
    /// 共享曲面的规范骨骼（兄弟中的第一个）
    pub canonical: usize,
    /// 父端封口是否使用父骨骼方向（兄弟数 > 1）
    pub use_parent_dir: bool,
    /// 组内全部骨骼，顺序同父骨骼的子列表
    pub siblings: Vec<usize>,
}

/// 解析兄弟骨骼合并
///
/// 启用合并且骨骼有父骨骼时，整组兄弟共享第一个兄弟的记录；否则骨骼自成一组。
pub fn resolve_canonical_bone<S>(skel: &S, bone_id: usize, factor_bones: bool) -> SiblingGroup
where
    S: SkeletonTopology + ?Sized,
{
    match skel.parent(bone_id) {
        Some(parent) if factor_bones => {
            let sons = skel.get_sons(parent);
            assert!(!sons.is_empty(), "parent bone {parent} has no children");
            SiblingGroup {
                canonical: sons[0],
                use_parent_dir: sons.len() > 1,
                siblings: sons.to_vec(),
            }
        }
        _ => SiblingGroup {
            canonical: bone_id,
            use_parent_dir: false,
            siblings: vec![bone_id],
        },
    }
}

/// 关节端封口：在骨骼末端沿骨骼方向外推子骨骼平均关节半径，生成一个采样
///
/// 叶子骨骼不生成任何采样。
pub fn compute_jcap<S, F>(skel: &S, bone_id: usize, junction_radius: F, out: &mut SampleList)
where
    S: SkeletonTopology + ?Sized,
    F: Fn(usize) -> f32,
{
    if skel.is_leaf(bone_id) {
        return;
    }

    let b = skel.get_bone(bone_id);

    // 子骨骼关节半径的平均值
    let children = skel.get_sons(bone_id);
    let jrad: f32 = children.iter().map(|&c| junction_radius(c)).sum();
    let jrad = jrad / children.len().max(1) as f32;

    let n = b.dir.normalize_or_zero();
    out.push(b.end + n * jrad, n);
}

/// 父端封口：在骨骼起点向内收 `radius`，法线朝外（与骨骼方向相反）
///
/// `use_parent_dir` 时以父骨骼末端和方向定位，多个兄弟汇聚于同一关节时使用。
pub fn compute_pcap<S>(
    skel: &S,
    bone_id: usize,
    radius: f32,
    use_parent_dir: bool,
    out: &mut SampleList,
) where
    S: SkeletonTopology + ?Sized,
{
    let parent = if use_parent_dir { skel.parent(bone_id) } else { None };
    debug_assert!(!use_parent_dir || parent.is_some());

    let (p, n) = match parent {
        Some(parent) => {
            let pb = skel.get_bone(parent);
            let d = pb.dir.normalize_or_zero();
            (pb.end - d * radius, -d)
        }
        None => {
            let b = skel.get_bone(bone_id);
            let d = b.dir.normalize_or_zero();
            (b.origin - d * radius, -d)
        }
    };
    out.push(p, n);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use glam::Vec3;

    #[test]
    fn test_resolve_without_factoring() {
        let skel = fixtures::fork();
        let group = resolve_canonical_bone(&skel, 2, false);
        assert_eq!(group.canonical, 2);
        assert!(!group.use_parent_dir);
        assert_eq!(group.siblings, vec![2]);
    }

    #[test]
    fn test_resolve_redirects_to_first_sibling() {
        let skel = fixtures::fork();
        let group = resolve_canonical_bone(&skel, 2, true);
        assert_eq!(group.canonical, 1);
        assert!(group.use_parent_dir);
        assert_eq!(group.siblings, vec![1, 2]);
    }

    #[test]
    fn test_resolve_single_child_and_root() {
        let skel = fixtures::chain();
        let group = resolve_canonical_bone(&skel, 1, true);
        assert_eq!(group.canonical, 1);
        assert!(!group.use_parent_dir);

        let root = resolve_canonical_bone(&skel, 0, true);
        assert_eq!(root.siblings, vec![0]);
    }

    #[test]
    fn test_jcap_leaf_is_empty() {
        let skel = fixtures::chain();
        let mut out = SampleList::new();
        compute_jcap(&skel, 1, |_| 1.0, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_jcap_averages_children_radii() {
        let skel = fixtures::fork();
        let mut out = SampleList::new();
        compute_jcap(&skel, 0, |c| if c == 1 { 2.0 } else { 4.0 }, &mut out);

        assert_eq!(out.len(), 1);
        let b = skel.get_bone(0);
        let d = b.dir.normalize();
        let s = out.get(0).unwrap();
        assert!(s.position.abs_diff_eq(b.end + d * 3.0, 1e-5));
        assert!(s.normal.abs_diff_eq(d, 1e-6));
    }

    #[test]
    fn test_pcap_own_direction() {
        let skel = fixtures::chain();
        let mut out = SampleList::new();
        compute_pcap(&skel, 1, 0.5, false, &mut out);

        let s = out.get(0).unwrap();
        // 骨骼 1 从 (0,1,0) 指向 (0,2,0)
        assert!(s.position.abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), 1e-6));
        assert!(s.normal.abs_diff_eq(Vec3::NEG_Y, 1e-6));
    }

    #[test]
    fn test_pcap_parent_direction() {
        let skel = fixtures::fork();
        let mut out = SampleList::new();
        compute_pcap(&skel, 1, 0.25, true, &mut out);

        let pb = skel.get_bone(0);
        let d = pb.dir.normalize();
        let s = out.get(0).unwrap();
        assert!(s.position.abs_diff_eq(pb.end - d * 0.25, 1e-6));
        assert!(s.normal.abs_diff_eq(-d, 1e-6));
    }
}
