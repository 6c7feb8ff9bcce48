//! OKR Domain Types
//!
//! This crate defines the domain types for tracking Objectives and Key
//! Results across a company → team → individual alignment hierarchy.
//!
//! # Key Concepts
//!
//! - **Objective**: a goal statement owned by exactly one user or team,
//!   decomposed into Key Results and positioned in the alignment tree through
//!   its `parent_id`.
//! - **Key Result**: a quantifiable measure (current / target / unit).
//! - **Owner**: a tagged union over users and teams.
//! - **Drafts**: records as entered, validated before identifiers are drawn.
//! - **Bands**: traffic-light thresholds for progress and final scores.
//!
//! # Architecture
//!
//! This is a pure types crate. Store, traversal, scoring and guards live in
//! `okr-runtime`. IDs use the newtype pattern and implement `Display`
//! and `new()`; fresh ids come from an [`IdGenerator`].

#![deny(unsafe_code)]

mod bands;
mod config;
mod directory;
mod draft;
mod errors;
mod ids;
mod key_result;
mod objective;
mod owner;

pub use bands::*;
pub use config::*;
pub use directory::*;
pub use draft::*;
pub use errors::*;
pub use ids::*;
pub use key_result::*;
pub use objective::*;
pub use owner::*;
