/// Append-only record of wallets created by the wallet manager
///
/// The file is a pretty-printed JSON array. Appending re-reads the array,
/// pushes one entry and rewrites it; existing entries are never dropped.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::BotError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    pub address: String,
    pub private_key: String,
    /// Value of the session cookie captured at registration (without the name)
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WalletStore {
    path: PathBuf,
}

impl WalletStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored records; a missing file is an empty store
    pub fn load(&self) -> Result<Vec<WalletRecord>, BotError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            BotError::config(format!(
                "Failed to read wallet store '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            BotError::config(format!(
                "Wallet store '{}' is not a JSON array of records: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Append one record and return the new record count
    pub fn append(&self, record: WalletRecord) -> Result<usize, BotError> {
        let mut records = self.load()?;
        records.push(record);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    BotError::config(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| BotError::config(format!("Failed to serialize wallet store: {}", e)))?;
        std::fs::write(&self.path, json).map_err(|e| {
            BotError::config(format!(
                "Failed to write wallet store '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(records.len())
    }
}
