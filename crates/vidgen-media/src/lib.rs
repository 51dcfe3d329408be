#![deny(unreachable_patterns)]
//! FFmpeg CLI wrapper for the VidGen pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with captured diagnostics
//! - Transition clip decoding into ordered frame image files
//! - Image-sequence video assembly at a fixed frame rate
//! - Cross-device file move helpers

pub mod command;
pub mod encode;
pub mod error;
pub mod frames;
pub mod fs;

pub use command::{check_ffmpeg, FfmpegCommand};
pub use encode::{assemble_frames, assemble_images};
pub use error::{MediaError, MediaResult};
pub use frames::extract_clip_frames;
pub use fs::{move_file, sorted_pngs};
