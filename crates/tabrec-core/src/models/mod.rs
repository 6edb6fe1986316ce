//! Data models for reconstructed documents and pipeline configuration.

pub mod config;
pub mod document;
