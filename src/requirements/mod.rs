//! Prerequisite detection.
//!
//! - [`checker`] - fail-fast existence checks for the MPI tools and PETSc
//! - [`probe`] - PATH lookup for interpreters

pub mod checker;
pub mod probe;

pub use checker::{check_paths, required_paths, validate_prerequisites, PathKind, PathRequirement};
pub use probe::{is_executable, resolve_tool_path, split_path};
