//! TOML run settings.
//!
//! ```toml
//! [sim]
//! ticks_per_hour = 12
//! total_ticks    = 2016
//! seed           = 7
//!
//! [behavior]
//! work_start_hour = 7
//! shopping_chance = 0.1
//! ```
//!
//! Both tables and every key are optional; anything missing keeps its
//! default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tc_behavior::BehaviorConfig;
use tc_core::SimConfig;

use crate::{SimError, SimResult};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimSettings {
    pub sim:      SimConfig,
    pub behavior: BehaviorConfig,
}

impl SimSettings {
    pub fn from_toml_str(s: &str) -> SimResult<Self> {
        let settings: SimSettings = toml::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.sim.ticks_per_hour == 0 {
            return Err(SimError::Config("ticks_per_hour must be at least 1".into()));
        }
        self.behavior.validate()?;
        Ok(())
    }
}
