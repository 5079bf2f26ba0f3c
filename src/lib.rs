// src/lib.rs

pub mod alert;
pub mod color;
pub mod config;
pub mod hud;
pub mod pipeline;
pub mod projection;
pub mod render;
pub mod types;
