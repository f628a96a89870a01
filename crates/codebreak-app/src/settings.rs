//! Application-level settings.
//!
//! Per-match options live in [`MatchConfig`](codebreak_game::MatchConfig);
//! these are the knobs that apply to every match the app runs.

use std::{path::PathBuf, time::Duration};

/// All application settings.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Computer opponent pacing.
    pub cpu: CpuSettings,
    /// Online relay behaviour.
    pub sync: SyncSettings,
    /// Where sessions and match history are stored.
    pub storage: StorageSettings,
}

/// Computer opponent pacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuSettings {
    /// Pause before the computer's guess is applied. Purely cosmetic.
    pub think_delay: Duration,
}

impl Default for CpuSettings {
    fn default() -> Self {
        Self {
            think_delay: Duration::from_millis(1200),
        }
    }
}

/// Online relay behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// How often a resynchronization request is sent to the peer.
    pub resync_interval: Duration,
    /// Maximum number of out-of-order events held while waiting for a gap to fill.
    pub max_buffered: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            resync_interval: Duration::from_secs(5),
            max_buffered: 256,
        }
    }
}

/// Storage location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    /// Directory holding the saved session and match history.
    pub data_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".codebreak"),
        }
    }
}
