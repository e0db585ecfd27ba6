// src/core/mod.rs

pub mod checker;
pub mod compatibility;
pub mod config_builder;
pub mod config_store;
pub mod manifest;
pub mod paths;
pub mod task_pipeline;
pub mod version_extractor;
