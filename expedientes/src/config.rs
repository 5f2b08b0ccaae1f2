use serde::{Deserialize, Serialize};

pub const DEFAULT_COLLECTION: &str = "antecedentes";
pub const DEFAULT_DUE_IN_DAYS: u32 = 7;
/// Upper bound for `default_due_in_days`, about ten years
pub const MAX_DUE_IN_DAYS: u32 = 3650;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub board: BoardConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct BoardConfig {
    /// Store collection holding the records
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Offset from today used as the due date of a new record
    #[serde(default = "default_due_in_days")]
    pub default_due_in_days: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            default_due_in_days: default_due_in_days(),
        }
    }
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_due_in_days() -> u32 {
    DEFAULT_DUE_IN_DAYS
}

impl Config {
    /// Loads `expedientes/config` if present, then `EXPEDIENTES_*` environment
    /// variables (e.g. `EXPEDIENTES_BOARD__COLLECTION`).
    pub fn new() -> anyhow::Result<Self> {
        Self::load(environment())
    }

    fn load(environment: config::Environment) -> anyhow::Result<Self> {
        let s = config::Config::builder()
            .add_source(config::File::with_name("expedientes/config").required(false))
            .add_source(environment)
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.board.default_due_in_days > MAX_DUE_IN_DAYS {
            anyhow::bail!(
                "board.default_due_in_days must be at most {MAX_DUE_IN_DAYS}, got {}",
                self.board.default_due_in_days
            );
        }
        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("EXPEDIENTES")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
