//! State management and checkpointing
//!
//! Tracks the last successfully replicated date per stream. The extraction
//! loop reads the checkpoint to compute its date window; the runner
//! persists the window's end date only after the loop completes normally.

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{State, StreamState};
