//! Validating builder for custom risk profiles

use super::registry;
use super::types::{RiskAppetite, RiskConfig, StopLossMethod, StrategyArchetype};
use crate::risk::RiskError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Upper bound for per-trade risk
pub const MAX_RISK_PER_TRADE: Decimal = dec!(0.10);
/// Upper bound for the drawdown circuit breaker
pub const MAX_DRAWDOWN_LIMIT: Decimal = dec!(0.50);
/// Upper bound for aggregate heat
pub const MAX_HEAT_LIMIT: Decimal = dec!(0.30);
/// Upper bound for the ATR stop multiplier
pub const MAX_ATR_MULTIPLIER: Decimal = dec!(10);

/// Builds a custom [`RiskConfig`] from a base profile plus overrides
///
/// # Example
///
/// ```rust
/// use riskguard::profile::{RiskAppetite, RiskConfig, StrategyArchetype};
/// use rust_decimal_macros::dec;
///
/// let config = RiskConfig::builder(StrategyArchetype::TrendFollowing, RiskAppetite::Moderate)
///     .unwrap()
///     .risk_per_trade(dec!(0.015))
///     .max_positions(2)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_positions(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RiskConfigBuilder {
    draft: RiskConfig,
}

impl RiskConfig {
    /// Start a custom profile from a registered row
    pub fn builder(
        archetype: StrategyArchetype,
        appetite: RiskAppetite,
    ) -> Result<RiskConfigBuilder, RiskError> {
        registry::get_config(archetype, appetite).map(RiskConfigBuilder::from_config)
    }
}

impl RiskConfigBuilder {
    /// Start from an existing configuration
    pub fn from_config(base: RiskConfig) -> Self {
        Self { draft: base }
    }

    pub fn risk_per_trade(mut self, value: Decimal) -> Self {
        self.draft.risk_per_trade = value;
        self
    }

    pub fn max_position_pct(mut self, value: Decimal) -> Self {
        self.draft.max_position_pct = value;
        self
    }

    pub fn max_positions(mut self, value: usize) -> Self {
        self.draft.max_positions = value;
        self
    }

    pub fn max_drawdown(mut self, value: Decimal) -> Self {
        self.draft.max_drawdown = value;
        self
    }

    pub fn portfolio_heat_limit(mut self, value: Decimal) -> Self {
        self.draft.portfolio_heat_limit = value;
        self
    }

    pub fn stop_loss_method(mut self, value: StopLossMethod) -> Self {
        self.draft.stop_loss_method = value;
        self
    }

    pub fn stop_loss_pct(mut self, value: Decimal) -> Self {
        self.draft.stop_loss_pct = value;
        self
    }

    pub fn atr_multiplier(mut self, value: Decimal) -> Self {
        self.draft.atr_multiplier = value;
        self
    }

    /// Validate and produce the immutable config
    ///
    /// # Errors
    ///
    /// Returns `RiskError::InvalidConfig` if any field is outside its safe
    /// range, or if `risk_per_trade` exceeds `portfolio_heat_limit` (no single
    /// trade could ever be admitted).
    pub fn build(self) -> Result<RiskConfig, RiskError> {
        let c = &self.draft;

        check_fraction("risk_per_trade", c.risk_per_trade, MAX_RISK_PER_TRADE)?;
        check_fraction("max_position_pct", c.max_position_pct, Decimal::ONE)?;
        check_fraction("max_drawdown", c.max_drawdown, MAX_DRAWDOWN_LIMIT)?;
        check_fraction("portfolio_heat_limit", c.portfolio_heat_limit, MAX_HEAT_LIMIT)?;

        if c.max_positions == 0 {
            return Err(RiskError::InvalidConfig(
                "max_positions must be at least 1".to_string(),
            ));
        }

        if c.stop_loss_pct <= Decimal::ZERO || c.stop_loss_pct >= Decimal::ONE {
            return Err(RiskError::InvalidConfig(format!(
                "stop_loss_pct must be in (0, 1), got {}",
                c.stop_loss_pct
            )));
        }

        check_fraction("atr_multiplier", c.atr_multiplier, MAX_ATR_MULTIPLIER)?;

        if c.risk_per_trade > c.portfolio_heat_limit {
            return Err(RiskError::InvalidConfig(format!(
                "risk_per_trade {} exceeds portfolio_heat_limit {}",
                c.risk_per_trade, c.portfolio_heat_limit
            )));
        }

        Ok(self.draft)
    }
}

fn check_fraction(name: &str, value: Decimal, max: Decimal) -> Result<(), RiskError> {
    if value <= Decimal::ZERO || value > max {
        return Err(RiskError::InvalidConfig(format!(
            "{name} must be in (0, {max}], got {value}"
        )));
    }
    Ok(())
}
