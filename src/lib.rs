//! Pointer-to-surface interaction for 3D model viewers: annotations pinned to
//! the model surface and point-to-point measurements, with camera orbiting
//! told apart from placement clicks.

pub mod config;
pub mod constants;
pub mod editor;
pub mod paths;
pub mod scene;
pub mod ui;
