#![forbid(unsafe_code)]

//! Render kernel: cells, screen buffers, dirty-region diffing, and the ANSI
//! output engine that turns changes into a near-minimal byte stream.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod double_buffer;
pub mod encoder;
pub mod terminal;
