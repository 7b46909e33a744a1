// src/capture/mod.rs
pub mod image_ref;

pub use image_ref::ImageRef;
