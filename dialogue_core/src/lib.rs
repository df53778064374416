//! # Dialogue Core
//!
//! The engine of a scripted two-character scene. This crate reads characters
//! and scene state from `scene_rules`, assembles a bounded prompt for each
//! speaker, and drives the turn-based session loop.
//!
//! ## Core Components
//!
//! - **context_assembler**: Deterministic prompt building with a bounded dialogue window
//! - **generator**: The text-generation capability the session calls
//! - **session**: Turn state machine, narrator commands and the operator seam
//! - **events**: What the session reports back to the operator
//! - **config**: TOML session configuration
//! - **testing**: Scripted generator, operator and clock for deterministic runs

pub mod config;
pub mod context_assembler;
pub mod events;
pub mod generator;
pub mod session;
pub mod testing;

pub use config::*;
pub use context_assembler::*;
pub use events::*;
pub use generator::*;
pub use session::*;
