//! Aegis engine crate.
//!
//! This crate owns the platform + GPU runtime pieces and the shield
//! intersection renderer built on top of them.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod math;
pub mod render;
pub mod scene;
