//! Security baseline generator engine.
//!
//! This crate provides:
//! - YAML rule documents with per-rule overlays and field-level customization tracking
//! - Filesystem corpus loader and a durable overlay store
//! - Tag index over the resolved corpus
//! - Interactive tailoring of rule inclusion and organization-defined values
//! - Baseline composition and rendering
//! - 800-53 control coverage checks

pub mod baseline;
pub mod benchmark;
pub mod controls;
pub mod loader;
pub mod schema;
pub mod tags;
pub mod tailoring;
