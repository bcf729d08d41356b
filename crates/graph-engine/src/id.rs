//! Identifier generators for nodes and clones
//!
//! Fresh ids come from explicit generator objects owned by the editor
//! session rather than from module-level counters, so tests can construct,
//! inject and reset them.

use std::time::{SystemTime, UNIX_EPOCH};

/// Generates ids for nodes created by block drops
#[derive(Debug, Default)]
pub struct NodeIdGenerator {
    counter: u64,
}

impl NodeIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next fresh node id
    pub fn next(&mut self) -> String {
        let id = format!("node_{}", self.counter);
        self.counter += 1;
        id
    }

    /// Reset the counter (tests, new sessions)
    pub fn reset(&mut self) {
        self.counter = 0;
    }
}

/// Generates ids for cloned nodes and edges (paste, duplicate-drag).
///
/// Ids combine a per-generator epoch with a monotonic counter, so clones
/// never collide with previously generated ids even across resets with a
/// fresh epoch.
#[derive(Debug)]
pub struct CloneIdGenerator {
    epoch: u64,
    counter: u64,
}

impl CloneIdGenerator {
    /// Generator stamped with the current wall-clock epoch
    pub fn new() -> Self {
        let epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self::with_epoch(epoch)
    }

    /// Generator with an injected epoch, for deterministic tests
    pub fn with_epoch(epoch: u64) -> Self {
        Self { epoch, counter: 0 }
    }

    /// Next fresh clone id
    pub fn next(&mut self) -> String {
        let id = format!("clone_{}_{}", self.epoch, self.counter);
        self.counter += 1;
        id
    }
}

impl Default for CloneIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
