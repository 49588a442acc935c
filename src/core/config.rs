//! Commander configuration loaded from TOML
//!
//! Strategy-level switches and scheduling live here. Fixed tactical numbers
//! (radii, thresholds, recon weights) are in `commander::constants`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{CommandError, Result};
use crate::squad::routing::DEFAULT_DROP_UNIT_TYPES;
use crate::units::UnitType;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommanderConfig {
    /// Radius around the main base in which a lone enemy worker is chased.
    /// Zero disables the scout-defense squad.
    pub scout_defense_radius: i32,

    /// Whether base defense may ever pull workers off mining
    pub workers_defend_rush: bool,

    /// Create the drop squad at startup
    pub drop_planned: bool,

    /// Start in attack posture rather than holding the front line
    pub go_aggressive: bool,

    /// Seed for the random choice among recon targets
    pub recon_seed: u64,

    /// The squad pipeline runs on ticks where `tick % period == phase`.
    ///
    /// With the default 8/1 the expensive reassignment work happens on one
    /// tick in eight, leaving the others for micro.
    pub squad_update_period: u64,
    pub squad_update_phase: u64,

    /// Detection-scan sweep, gated the same way on a different phase
    pub scan_period: u64,
    pub scan_phase: u64,

    /// Unit types the drop squad will carry
    pub drop_unit_types: Vec<UnitType>,
}

impl Default for CommanderConfig {
    fn default() -> Self {
        Self {
            scout_defense_radius: 600,
            workers_defend_rush: true,
            drop_planned: false,
            go_aggressive: true,
            recon_seed: 42,
            squad_update_period: 8,
            squad_update_phase: 1,
            scan_period: 4,
            scan_phase: 2,
            drop_unit_types: DEFAULT_DROP_UNIT_TYPES.to_vec(),
        }
    }
}

impl CommanderConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Config that runs every sweep on every tick, for tests and replays
    pub fn every_tick() -> Self {
        Self {
            squad_update_period: 1,
            squad_update_phase: 0,
            scan_period: 1,
            scan_phase: 0,
            ..Self::default()
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: CommanderConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.scout_defense_radius < 0 {
            return Err(CommandError::Config(format!(
                "scout_defense_radius ({}) must not be negative",
                self.scout_defense_radius
            )));
        }

        for (name, period, phase) in [
            ("squad_update", self.squad_update_period, self.squad_update_phase),
            ("scan", self.scan_period, self.scan_phase),
        ] {
            if period == 0 {
                return Err(CommandError::Config(format!("{}_period must be positive", name)));
            }
            if phase >= period {
                return Err(CommandError::Config(format!(
                    "{}_phase ({}) must be < {}_period ({})",
                    name, phase, name, period
                )));
            }
        }

        if let Some(bad) = self.drop_unit_types.iter().find(|t| t.space_required() == 0) {
            return Err(CommandError::Config(format!(
                "drop unit type {:?} cannot ride in a transport",
                bad
            )));
        }

        Ok(())
    }
}

/// Load commander config from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> Result<CommanderConfig> {
    let contents = fs::read_to_string(path.as_ref())?;
    CommanderConfig::from_toml_str(&contents)
}
