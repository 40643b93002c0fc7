//! Core library for the task-list backend
//!
//! This crate contains the core business logic, including:
//! - The task data model and its category enumeration
//! - The document-store interface and its file-backed implementation

pub mod error;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
