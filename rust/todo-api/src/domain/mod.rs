//! Core domain models.
//!
//! This module contains the todo record and the payloads used to create and
//! modify it.

pub mod todo;

pub use todo::*;
