//! Named text animations and their keyframe sampling.

pub(crate) mod keyframes;
pub mod presets;
