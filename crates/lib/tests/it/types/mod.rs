//! TypeRegistry integration tests
//!
//! This module tests type registration, schema resolution, behavior dispatch
//! and the pluggable collaborators. Tests are organized by concern.

mod access;
mod collaborators;
mod registration;
