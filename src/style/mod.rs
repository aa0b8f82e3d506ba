//! Form-control to preview binding: colors, presets, uploads.

pub mod binding;
pub mod color;
pub mod image;
pub mod preset;
