//! Common types and utilities for the rtti runtime type engine.
//!
//! This crate provides foundational types shared by the solver and the CLI:
//! - Source locations attached to inlined assertions (`SourceLocation`)
//! - Centralized limits and thresholds

// Position types for line/column source locations
pub mod position;
pub use position::SourceLocation;

// Centralized limits and thresholds
pub mod limits;
