pub mod stage0_repair;
pub mod stage1_normalize;
pub mod stage2_flatten;
pub mod stage3_merge;
pub mod stage4_sort;

pub use stage0_repair::*;
pub use stage1_normalize::*;
pub use stage2_flatten::*;
pub use stage3_merge::*;
pub use stage4_sort::*;
