//! Integration tests for the history coordination protocol.
//!
//! These drive a full supervisor/tracker/actor stack through coordinated
//! rounds and verify the observable properties: round-trip restoration,
//! undo/redo inversion, branch pruning, barrier exactness, and backend
//! relay ordering.

pub mod failure;
pub mod properties;
pub mod rounds;

use cellscribe::HistoryConfig;

/// Config with a short timeout so a broken barrier fails the test quickly.
pub fn fast_config() -> HistoryConfig {
    HistoryConfig {
        round_timeout_ms: Some(1_000),
        ..HistoryConfig::default()
    }
}
