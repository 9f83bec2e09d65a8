//! System configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use super::extruder::ExtruderConfig;
use super::legacy::LegacyExtruderConfig;

/// Name under which the legacy single-extruder section is exposed.
pub const LEGACY_EXTRUDER_NAME: &str = "extruder";

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemConfig {
    /// Optional legacy single-extruder section.
    #[serde(default)]
    pub legacy: Option<LegacyExtruderConfig>,

    /// Named extruder configurations.
    #[serde(default)]
    pub extruders: FnvIndexMap<String<32>, ExtruderConfig, 8>,
}

impl SystemConfig {
    /// Get an extruder configuration by name.
    ///
    /// Named instances take precedence; the legacy section answers to
    /// [`LEGACY_EXTRUDER_NAME`] when no instance of that name exists.
    pub fn extruder(&self, name: &str) -> Option<ExtruderConfig> {
        let named = self
            .extruders
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v.clone());

        match (named, &self.legacy) {
            (Some(config), _) => Some(config),
            (None, Some(legacy)) if name == LEGACY_EXTRUDER_NAME => {
                Some(legacy.to_extruder_config())
            }
            _ => None,
        }
    }

    /// List all extruder names, legacy included.
    pub fn extruder_names(&self) -> impl Iterator<Item = &str> {
        let legacy = self
            .legacy
            .as_ref()
            .filter(|_| !self.extruders.keys().any(|k| k.as_str() == LEGACY_EXTRUDER_NAME))
            .map(|_| LEGACY_EXTRUDER_NAME);
        legacy
            .into_iter()
            .chain(self.extruders.keys().map(|s| s.as_str()))
    }

    /// Every configured extruder, legacy first.
    pub fn all_extruders(&self) -> impl Iterator<Item = (&str, ExtruderConfig)> + '_ {
        self.extruder_names()
            .filter_map(move |name| self.extruder(name).map(|config| (name, config)))
    }
}
