pub mod stage0_split;
pub mod stage1_assemble;
pub mod stage2_project;
pub mod stage3_render;

pub use stage0_split::*;
pub use stage1_assemble::*;
pub use stage2_project::*;
pub use stage3_render::*;
