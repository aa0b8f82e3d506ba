//! CPU rasterization of the preview region.

pub mod backend;
pub mod cpu;
pub(crate) mod text;
