//! Common types and utilities for the rxwire dispatch generator.
//!
//! This crate provides foundational types used across all rxwire crates:
//! - Value-equality sequences (`EquatableSequence`, `component_hash`)
//! - Tagged stage outcomes (`Outcome`, `RejectReason`)
//! - Source locations (`CallerLocation`)
//! - Cooperative pass cancellation (`CancellationToken`)

// Value-equality sequence container used inside every cache key
pub mod sequence;
pub use sequence::{EquatableSequence, component_hash, element_hash};

// Tagged outcomes - every silent-skip stage returns one of these
pub mod outcome;
pub use outcome::{Outcome, RejectReason};

// Caller location tracking (file/line/column of a call-site)
pub mod location;
pub use location::CallerLocation;

// Cooperative cancellation for the host build pipeline
pub mod cancellation;
pub use cancellation::CancellationToken;
