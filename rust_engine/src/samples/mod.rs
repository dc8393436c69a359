//! 每根骨骼的 HRBF 采样集合

mod caps;
mod input;
mod list;
mod set;

pub use caps::{compute_jcap, compute_pcap, resolve_canonical_bone, SiblingGroup};
pub use input::{CapRecord, InputSample};
pub use list::{HermiteSample, SampleList};
pub use set::SampleSet;
