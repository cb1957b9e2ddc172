use std::path::Path;
use serde::{Serialize, Deserialize, de::DeserializeOwned};

use super::{
    cost::{CostModel, GridHeuristic},
    error::PathError,
};
use crate::log;

// ----------------------------------------------
// SearchOptions
// ----------------------------------------------

// Per-request knobs passed to every search.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    // 8-connected when true, 4-connected otherwise.
    pub allow_diagonal: bool,

    // Strict corner rule: a diagonal move needs both orthogonal flanks open.
    // When false a diagonal is only rejected if both flanks are blocked.
    pub prevent_corner_cutting: bool,

    // Reduce the raw path to line-of-sight waypoints.
    pub smooth_path: bool,

    pub costs: CostModel,
}

impl SearchOptions {
    pub fn orthogonal() -> Self {
        Self { allow_diagonal: false, ..Self::diagonal() }
    }

    pub fn diagonal() -> Self {
        Self {
            allow_diagonal: true,
            prevent_corner_cutting: true,
            smooth_path: true,
            costs: CostModel::default(),
        }
    }

    #[inline]
    pub fn with_costs(mut self, costs: CostModel) -> Self {
        self.costs = costs;
        self
    }

    #[inline]
    pub fn validate(&self) -> Result<(), PathError> {
        self.costs.validate(self.allow_diagonal)
    }

    #[inline]
    pub fn heuristic(&self) -> GridHeuristic {
        GridHeuristic::new(self.costs, self.allow_diagonal)
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::diagonal()
    }
}

// ----------------------------------------------
// Configs
// ----------------------------------------------

pub trait Configs: Sized + Default + Serialize + DeserializeOwned {
    // Fix up values after loading. Invalid entries should be reset to defaults.
    fn post_load(&mut self) {
    }

    // Saves current configs to a JSON file.
    fn save_file(&self, config_json_path: &Path) -> bool {
        if let Some(parent) = config_json_path.parent() {
            // Ignore errors, the directory may already exist.
            let _ = std::fs::create_dir_all(parent);
        }

        let json = match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(err) => {
                log::error!(log::channel!("config"), "Failed to save config file {config_json_path:?}: {err}");
                return false;
            }
        };

        if let Err(err) = std::fs::write(config_json_path, json) {
            log::error!(log::channel!("config"), "Failed to write config file {config_json_path:?}: {err}");
            return false;
        }

        true
    }

    // Either succeeds loading the config file or returns a default config.
    fn load_file(config_json_path: &Path) -> Self {
        let json = match std::fs::read_to_string(config_json_path) {
            Ok(json) => json,
            Err(err) => {
                log::error!(log::channel!("config"), "Failed to read config file from path {config_json_path:?}: {err}");
                return Self::default();
            }
        };

        let mut configs = match serde_json::from_str::<Self>(&json) {
            Ok(configs) => configs,
            Err(err) => {
                log::error!(log::channel!("config"), "Failed to deserialize config file from path {config_json_path:?}: {err}");
                Self::default()
            }
        };

        configs.post_load();
        configs
    }
}

// ----------------------------------------------
// SearchConfigs
// ----------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)] // Missing fields in the config file get defaults from SearchConfigs::default().
pub struct SearchConfigs {
    pub allow_diagonal: bool,
    pub prevent_corner_cutting: bool,
    pub smooth_path: bool,
    pub costs: CostModel,

    // Minimum level applied with apply_log_level().
    pub log_level: log::Level,
}

impl SearchConfigs {
    // Strict parse: malformed JSON or invalid costs are errors.
    pub fn from_json_str(json: &str) -> Result<Self, PathError> {
        let configs: Self = serde_json::from_str(json)
            .map_err(|err| PathError::InvalidConfiguration(format!("malformed search configs: {err}")))?;
        configs.options().validate()?;
        Ok(configs)
    }

    pub fn to_json_string(&self) -> Result<String, PathError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| PathError::InvalidConfiguration(format!("failed to serialize search configs: {err}")))
    }

    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            allow_diagonal: self.allow_diagonal,
            prevent_corner_cutting: self.prevent_corner_cutting,
            smooth_path: self.smooth_path,
            costs: self.costs,
        }
    }

    pub fn apply_log_level(&self) {
        log::set_level(self.log_level);
    }
}

impl Configs for SearchConfigs {
    fn post_load(&mut self) {
        if let Err(err) = self.options().validate() {
            log::error!(log::channel!("config"), "{err}. Falling back to default search costs.");
            self.costs = CostModel::default();
        }
    }
}

impl Default for SearchConfigs {
    fn default() -> Self {
        let options = SearchOptions::default();
        Self {
            allow_diagonal: options.allow_diagonal,
            prevent_corner_cutting: options.prevent_corner_cutting,
            smooth_path: options.smooth_path,
            costs: options.costs,
            log_level: log::Level::Info,
        }
    }
}

impl From<&SearchConfigs> for SearchOptions {
    fn from(configs: &SearchConfigs) -> Self {
        configs.options()
    }
}
