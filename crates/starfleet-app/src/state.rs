//! State shared between a host front end and the game loop thread.

use std::sync::{Arc, Mutex};

use starfleet_core::commands::{PlayerCommand, PlayerInput};
use starfleet_core::state::GameStateSnapshot;

/// Messages sent from the host to the game loop thread.
#[derive(Debug, Clone, PartialEq)]
pub enum GameLoopCommand {
    /// A discrete player command, processed at the next tick boundary.
    Player(PlayerCommand),
    /// Replace the held control state.
    Input(PlayerInput),
    /// Stop the game loop thread.
    Shutdown,
}

/// Latest snapshot, written by the game loop after every tick.
/// `None` until the first tick has run.
pub type SharedSnapshot = Arc<Mutex<Option<GameStateSnapshot>>>;

pub fn shared_snapshot() -> SharedSnapshot {
    Arc::new(Mutex::new(None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_snapshot_starts_empty() {
        let shared = shared_snapshot();
        assert!(shared.lock().unwrap().is_none());
    }
}
