//! In-memory model of the preview region: caption, resolved style, background and markers.

pub mod region;
