//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the storage backends files are written to.

pub mod storage;
