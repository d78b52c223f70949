//! Player preferences
//!
//! Persisted separately from results in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::tuning::{ExchangePolicy, Ruleset, Tuning};

/// All user-configurable settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Balance preset
    pub ruleset: Ruleset,
    /// Exchange booth behavior while lingering
    pub exchange_policy: ExchangePolicy,
    /// Let the autopilot play (attract mode)
    pub autopilot: bool,
    /// Fixed seed for replays; random when None
    pub seed_override: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ruleset: Ruleset::Classic,
            exchange_policy: ExchangePolicy::EveryFrame,
            autopilot: false,
            seed_override: None,
        }
    }
}

impl Settings {
    /// Create settings from a ruleset
    pub fn from_ruleset(ruleset: Ruleset) -> Self {
        Self {
            ruleset,
            ..Self::default()
        }
    }

    /// Balance table for a new shift
    pub fn tuning(&self) -> Tuning {
        Tuning {
            exchange_policy: self.exchange_policy,
            ..self.ruleset.tuning()
        }
    }

    /// Seed for a new shift, `fallback` unless a replay seed is set
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed_override.unwrap_or(fallback)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "pizza_dash_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved ({} rules)", self.ruleset.as_str());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
