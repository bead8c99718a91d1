//! Configuration types for riskguard

use crate::profile::{
    get_config, RiskAppetite, RiskConfig, RiskConfigBuilder, StopLossMethod, StrategyArchetype,
};
use crate::risk::{BookkeepingPolicy, LotSize, RiskError, RiskManager};
use crate::telemetry::LogFormat;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub engine: EngineConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Risk engine session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub archetype: StrategyArchetype,
    pub appetite: RiskAppetite,
    #[serde(default)]
    pub lot: LotConfig,
    #[serde(default)]
    pub bookkeeping: BookkeepingPolicy,
    /// Custom profile overrides, validated on build
    #[serde(default)]
    pub overrides: Option<ProfileOverrides>,
}

/// Instrument quantity granularity
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LotConfig {
    /// Whole units only
    #[default]
    Whole,
    /// Fractional units
    Fractional {
        decimals: u32,
        #[serde(default)]
        min_quantity: Option<Decimal>,
    },
}

impl LotConfig {
    /// Resolve the lot size, rejecting unrepresentable steps and minimums
    pub fn lot_size(&self) -> Result<LotSize, RiskError> {
        match self {
            LotConfig::Whole => Ok(LotSize::whole()),
            LotConfig::Fractional {
                decimals,
                min_quantity,
            } => {
                let lot = LotSize::fractional(*decimals)?;
                match min_quantity {
                    Some(min) if *min <= Decimal::ZERO => Err(RiskError::InvalidConfig(format!(
                        "lot min_quantity must be positive, got {min}"
                    ))),
                    Some(min) => Ok(lot.with_min_quantity(*min)),
                    None => Ok(lot),
                }
            }
        }
    }
}

/// Per-field overrides on top of the registered profile
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileOverrides {
    pub risk_per_trade: Option<Decimal>,
    pub max_position_pct: Option<Decimal>,
    pub max_positions: Option<usize>,
    pub max_drawdown: Option<Decimal>,
    pub portfolio_heat_limit: Option<Decimal>,
    pub stop_loss_method: Option<StopLossMethod>,
    pub stop_loss_pct: Option<Decimal>,
    pub atr_multiplier: Option<Decimal>,
}

impl ProfileOverrides {
    /// Apply every set field to a builder
    pub fn apply(&self, mut builder: RiskConfigBuilder) -> RiskConfigBuilder {
        if let Some(v) = self.risk_per_trade {
            builder = builder.risk_per_trade(v);
        }
        if let Some(v) = self.max_position_pct {
            builder = builder.max_position_pct(v);
        }
        if let Some(v) = self.max_positions {
            builder = builder.max_positions(v);
        }
        if let Some(v) = self.max_drawdown {
            builder = builder.max_drawdown(v);
        }
        if let Some(v) = self.portfolio_heat_limit {
            builder = builder.portfolio_heat_limit(v);
        }
        if let Some(v) = self.stop_loss_method {
            builder = builder.stop_loss_method(v);
        }
        if let Some(v) = self.stop_loss_pct {
            builder = builder.stop_loss_pct(v);
        }
        if let Some(v) = self.atr_multiplier {
            builder = builder.atr_multiplier(v);
        }
        builder
    }
}

impl EngineConfig {
    /// Resolve the effective risk profile
    pub fn risk_config(&self) -> Result<RiskConfig, RiskError> {
        let base = get_config(self.archetype, self.appetite)?;
        match &self.overrides {
            Some(overrides) => overrides.apply(RiskConfigBuilder::from_config(base)).build(),
            None => Ok(base),
        }
    }

    /// Build a session risk manager from this configuration
    pub fn build_manager(&self) -> Result<RiskManager, RiskError> {
        let config = self.risk_config()?;
        let lot = self.lot.lot_size()?;
        tracing::info!(
            archetype = %self.archetype,
            appetite = %self.appetite,
            custom = self.overrides.is_some(),
            "Building risk manager"
        );
        Ok(RiskManager::with_config(config)
            .with_lot_size(lot)
            .with_bookkeeping(self.bookkeeping))
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
