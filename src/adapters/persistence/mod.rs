//! Persistence adapters. JSONL document store and JSON sequence file.

pub mod fs_repo;
pub mod state_json;

pub use fs_repo::FsRepo;
pub use state_json::StateJson;
