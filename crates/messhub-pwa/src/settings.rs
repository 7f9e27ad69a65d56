//! PWA settings
//!
//! The user-configurable settings blob persisted in local storage, and the
//! tagged messages that tell the worker about setting changes.

use messhub_platform::LocalStorage;
use serde::{Deserialize, Serialize};

pub const SETTINGS_KEY: &str = "pwa-settings";

/// User-configurable PWA behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PwaSettings {
    pub offline_enabled: bool,
    pub data_sync: bool,
}

impl Default for PwaSettings {
    fn default() -> Self {
        Self {
            offline_enabled: true,
            data_sync: true,
        }
    }
}

/// Settings change messages posted to the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum WorkerMessage {
    #[serde(rename = "UPDATE_CACHE_SETTINGS", rename_all = "camelCase")]
    UpdateCacheSettings { offline_enabled: bool },
    #[serde(rename = "UPDATE_SYNC_SETTINGS", rename_all = "camelCase")]
    UpdateSyncSettings { data_sync: bool },
}

/// Load the stored settings; missing or damaged blobs read as defaults
pub fn load_settings(storage: &LocalStorage) -> PwaSettings {
    let Ok(Some(raw)) = storage.get_item(SETTINGS_KEY) else {
        return PwaSettings::default();
    };

    match serde_json::from_str(&raw) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(%err, "discarding unreadable settings blob");
            PwaSettings::default()
        }
    }
}

/// Persist the settings; `false` when storage is unavailable
pub fn save_settings(storage: &LocalStorage, settings: &PwaSettings) -> bool {
    let raw = match serde_json::to_string(settings) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::error!(%err, "failed to encode settings");
            return false;
        }
    };

    match storage.set_item(SETTINGS_KEY, &raw) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(%err, "settings not saved");
            false
        }
    }
}
