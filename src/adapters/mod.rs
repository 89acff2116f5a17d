//! Infrastructure adapters. Implement ports.
//!
//! Filesystem storage, document export, LLM access, terminal UI. Map errors to DomainError.

pub mod ai;
pub mod persistence;
pub mod render;
pub mod ui;
