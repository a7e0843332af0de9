//! Query engine facade over a corpus snapshot.

/// Stateless entry point for every query. Each subsystem module adds its
/// operations to this type; all of them are pure functions of the
/// snapshot and the parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEngine;

impl QueryEngine {
    pub fn new() -> Self {
        Self
    }
}
