//! Game configuration.
//!
//! All tunable constants of a game live in `GameConfig`. The defaults are
//! the standard Giganten values; any subset can be overridden from a JSON
//! file, missing fields keep their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::eval::ScoringWeights;
use crate::game::oil_price::PriceModel;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Cost of moving a train into each column. Column 0 is the depot.
pub const TRAIN_COSTS: [i32; 20] = [0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2, 3, 3, 3];

/// Oil markers printed on the tiles covering 1-, 2- and 3-well cells.
pub fn default_tile_reserves() -> [Vec<u32>; 3] {
    let repeat = |pairs: &[(u32, usize)]| -> Vec<u32> {
        pairs
            .iter()
            .flat_map(|&(value, count)| std::iter::repeat(value).take(count))
            .collect()
    };
    [
        repeat(&[(2, 4), (3, 4), (4, 4)]),
        repeat(&[(2, 6), (5, 6)]),
        repeat(&[(4, 4), (5, 4), (6, 4)]),
    ]
}

/// Tunable constants of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Destination score weights.
    pub weights: ScoringWeights,
    /// Train cost per column; must be non-decreasing.
    pub train_costs: Vec<i32>,
    /// Starting row of each seat's truck, in column 0.
    pub truck_start_rows: Vec<usize>,
    pub initial_cash: i64,
    pub initial_oil_rigs: u32,
    /// Barrels a player can hold in storage.
    pub storage_capacity: u32,
    pub oil_companies: usize,
    pub initial_oil_price: i64,
    /// Rule applied to each company's price at the start of a turn.
    pub price_model: PriceModel,
    /// Drop in a company's bid after each barrel it buys.
    pub price_step: i64,
    /// Fee per barrel owed to each rival whose train is further along.
    pub transport_fee: i64,
    /// Oil reserve tiles for cells with 1, 2 and 3 wells.
    pub tile_reserves: [Vec<u32>; 3],
    pub single_licenses: usize,
    pub double_licenses: usize,
    /// Hard stop for a game that never ends on its own.
    pub max_turns: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            weights: ScoringWeights::default(),
            train_costs: TRAIN_COSTS.to_vec(),
            truck_start_rows: vec![0, 2, 4, 6],
            initial_cash: 15_000,
            initial_oil_rigs: 5,
            storage_capacity: 6,
            oil_companies: 3,
            initial_oil_price: 5_000,
            price_model: PriceModel::Zoned,
            price_step: 500,
            transport_fee: 1_000,
            tile_reserves: default_tile_reserves(),
            single_licenses: 40,
            double_licenses: 20,
            max_turns: 100,
        }
    }
}

impl GameConfig {
    /// Checks the constraints the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.train_costs.is_empty() {
            return Err(ConfigError::Invalid("train_costs is empty".to_string()));
        }
        if self.train_costs.windows(2).any(|w| w[0] > w[1]) {
            return Err(ConfigError::Invalid(
                "train_costs must be non-decreasing".to_string(),
            ));
        }
        if self.train_costs.iter().any(|&c| c < 0) {
            return Err(ConfigError::Invalid(
                "train_costs must not be negative".to_string(),
            ));
        }
        if self.truck_start_rows.is_empty() {
            return Err(ConfigError::Invalid("truck_start_rows is empty".to_string()));
        }
        let mut rows = self.truck_start_rows.clone();
        rows.sort_unstable();
        rows.dedup();
        if rows.len() != self.truck_start_rows.len() {
            return Err(ConfigError::Invalid(
                "truck_start_rows must be distinct".to_string(),
            ));
        }
        if self.oil_companies == 0 {
            return Err(ConfigError::Invalid("oil_companies must be positive".to_string()));
        }
        if self.price_step < 0 || self.transport_fee < 0 {
            return Err(ConfigError::Invalid(
                "price_step and transport_fee must not be negative".to_string(),
            ));
        }
        if let Some(wells) = self.tile_reserves.iter().position(|t| t.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "no oil tiles for {}-well cells",
                wells + 1
            )));
        }
        if self.single_licenses + self.double_licenses == 0 {
            return Err(ConfigError::Invalid("license deck is empty".to_string()));
        }
        Ok(())
    }
}

/// Loads and validates a configuration from a JSON file.
pub fn load_config(path: &Path) -> Result<GameConfig, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_config_from_str(&data)
}

/// Loads and validates a configuration from a JSON string.
pub fn load_config_from_str(json: &str) -> Result<GameConfig, ConfigError> {
    let config: GameConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}
