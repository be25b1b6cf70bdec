//! State types for tracking replication progress
//!
//! These types are serialized to JSON and persisted between runs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete state for a connector
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct State {
    /// Per-stream state
    #[serde(default)]
    pub streams: HashMap<String, StreamState>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get state for a stream
    pub fn get_stream(&self, stream: &str) -> Option<&StreamState> {
        self.streams.get(stream)
    }

    /// Get mutable state for a stream, creating if needed
    pub fn get_stream_mut(&mut self, stream: &str) -> &mut StreamState {
        self.streams.entry(stream.to_string()).or_default()
    }

    /// Get the replication checkpoint for a stream
    pub fn get_checkpoint(&self, stream: &str) -> Option<NaiveDate> {
        self.streams.get(stream)?.replicated_until
    }

    /// Set the replication checkpoint for a stream
    pub fn set_checkpoint(&mut self, stream: &str, date: NaiveDate) {
        self.get_stream_mut(stream).replicated_until = Some(date);
    }
}

/// State for a single stream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamState {
    /// Last date fully replicated (inclusive)
    #[serde(default)]
    pub replicated_until: Option<NaiveDate>,
}
