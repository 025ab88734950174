//! The configuration save action
//!
//! Sequence for one submitted change:
//!
//! 1. Parse and range-check the submitted history length
//! 2. Persist the new length in the configuration file
//! 3. Apply it to the manager (evicts down to the new bound)
//! 4. Record the current configuration blob, when one is supplied
//! 5. Prune, unconditionally
//!
//! Validation failures stop at step 1 with nothing changed. A failure to
//! write the configuration file stops at step 2, also with nothing changed.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::config::{Config, ConfigError};
use crate::retention::{HistoryLength, HistoryRetentionManager, RetentionError, SequenceNumber};
use crate::store::HistoryStore;

/// Result type for the save action
pub type ConfigureResult<T> = Result<T, ConfigureError>;

#[derive(Debug, Error)]
pub enum ConfigureError {
    #[error(transparent)]
    Retention(#[from] RetentionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ConfigureError {
    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ConfigureError::Retention(e) => e.code(),
            ConfigureError::Config(_) => "CONFHIST_CONFIG_ERROR",
        }
    }

    /// Whether the user can fix this by submitting a different value
    pub fn is_user_correctable(&self) -> bool {
        match self {
            ConfigureError::Retention(e) => e.is_user_correctable(),
            ConfigureError::Config(_) => false,
        }
    }

    /// Message for the person who submitted the change
    pub fn user_message(&self) -> String {
        match self {
            ConfigureError::Retention(e) => e.user_message(),
            ConfigureError::Config(_) => {
                "The configuration could not be saved, please try again later".to_string()
            }
        }
    }
}

/// One submitted configuration change
#[derive(Debug, Clone)]
pub struct SaveRequest<'a> {
    /// History length exactly as submitted
    pub history_length: &'a str,
    /// Current configuration state to record, if any
    pub snapshot: Option<Vec<u8>>,
}

/// What a successful save did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    pub history_length: HistoryLength,
    /// Sequence number of the recorded snapshot
    pub recorded: Option<SequenceNumber>,
    /// Snapshots evicted by the final prune
    pub evicted: usize,
}

/// Applies configuration changes to a manager and its configuration file.
pub struct ConfigureAction<'a, S> {
    manager: &'a HistoryRetentionManager<S>,
    config: &'a mut Config,
    config_path: &'a Path,
}

impl<'a, S: HistoryStore> ConfigureAction<'a, S> {
    pub fn new(
        manager: &'a HistoryRetentionManager<S>,
        config: &'a mut Config,
        config_path: &'a Path,
    ) -> Self {
        Self {
            manager,
            config,
            config_path,
        }
    }

    /// Runs the save sequence for `request`.
    pub fn save(&mut self, request: SaveRequest<'_>) -> ConfigureResult<SaveOutcome> {
        let length = HistoryLength::parse(request.history_length)?;

        let mut updated = self.config.clone();
        updated.history_length = length;
        updated.save(self.config_path)?;
        *self.config = updated;

        self.manager.set_history_length(i64::from(length.get()))?;

        let recorded = match request.snapshot {
            Some(blob) => Some(self.manager.record_snapshot(blob)?),
            None => None,
        };

        let evicted = self.manager.prune()?;

        info!(
            history_length = length.get(),
            recorded = ?recorded,
            evicted,
            "configuration saved"
        );
        Ok(SaveOutcome {
            history_length: length,
            recorded,
            evicted,
        })
    }
}
