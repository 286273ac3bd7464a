//! Data models for the scan pipeline.

pub mod config;
pub mod image;
pub mod record;
