//! # Scene Rules
//!
//! The data model of a scripted radio-drama scene: characters with their
//! append-only dialogue logs, the mutable scene they share, and the JSON
//! storage that keeps both on disk. This crate contains no generation logic.

pub mod entities;
pub mod scene_state;
pub mod store;

pub use entities::*;
pub use scene_state::*;
pub use store::*;
