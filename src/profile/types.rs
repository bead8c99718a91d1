//! Risk profile types

use clap::ValueEnum;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How much risk the operator is willing to take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RiskAppetite {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskAppetite {
    pub const ALL: [RiskAppetite; 3] = [
        RiskAppetite::Conservative,
        RiskAppetite::Moderate,
        RiskAppetite::Aggressive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskAppetite::Conservative => "conservative",
            RiskAppetite::Moderate => "moderate",
            RiskAppetite::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for RiskAppetite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy family, supplied explicitly by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StrategyArchetype {
    /// Moving-average and MACD crossovers
    TrendFollowing,
    /// RSI and band reversion
    MeanReversion,
    /// Rate-of-change momentum
    Momentum,
    /// Long-horizon, low-turnover holding
    BuyHold,
}

impl StrategyArchetype {
    pub const ALL: [StrategyArchetype; 4] = [
        StrategyArchetype::TrendFollowing,
        StrategyArchetype::MeanReversion,
        StrategyArchetype::Momentum,
        StrategyArchetype::BuyHold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyArchetype::TrendFollowing => "trend_following",
            StrategyArchetype::MeanReversion => "mean_reversion",
            StrategyArchetype::Momentum => "momentum",
            StrategyArchetype::BuyHold => "buy_hold",
        }
    }
}

impl fmt::Display for StrategyArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stop placement method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StopLossMethod {
    /// Fixed percentage away from entry
    Percentage,
    /// Multiple of Average True Range away from entry
    Atr,
    /// Caller-supplied support/resistance level
    SupportResistance,
}

impl fmt::Display for StopLossMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopLossMethod::Percentage => "percentage",
            StopLossMethod::Atr => "atr",
            StopLossMethod::SupportResistance => "support_resistance",
        };
        f.write_str(s)
    }
}

/// Immutable risk parameters for one strategy session
///
/// Instances come from the built-in registry or from
/// [`RiskConfigBuilder`](super::RiskConfigBuilder), which validates every
/// field. All fractions are of account equity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskConfig {
    pub(crate) risk_per_trade: Decimal,
    pub(crate) max_position_pct: Decimal,
    pub(crate) max_positions: usize,
    pub(crate) max_drawdown: Decimal,
    pub(crate) portfolio_heat_limit: Decimal,
    pub(crate) stop_loss_method: StopLossMethod,
    pub(crate) stop_loss_pct: Decimal,
    pub(crate) atr_multiplier: Decimal,
}

impl RiskConfig {
    /// Fraction of equity risked on a single trade
    pub fn risk_per_trade(&self) -> Decimal {
        self.risk_per_trade
    }

    /// Maximum notional of one position as a fraction of equity
    pub fn max_position_pct(&self) -> Decimal {
        self.max_position_pct
    }

    /// Maximum concurrent open positions
    pub fn max_positions(&self) -> usize {
        self.max_positions
    }

    /// Drawdown from peak at which new entries stop
    pub fn max_drawdown(&self) -> Decimal {
        self.max_drawdown
    }

    /// Maximum aggregate capital at risk
    pub fn portfolio_heat_limit(&self) -> Decimal {
        self.portfolio_heat_limit
    }

    pub fn stop_loss_method(&self) -> StopLossMethod {
        self.stop_loss_method
    }

    pub fn stop_loss_pct(&self) -> Decimal {
        self.stop_loss_pct
    }

    pub fn atr_multiplier(&self) -> Decimal {
        self.atr_multiplier
    }

    /// Format as a profile block for CLI output
    pub fn summary(&self, title: &str) -> String {
        let hundred = dec!(100);
        format!(
            r#"
══════════════════════════════════════════════════════
  {}
══════════════════════════════════════════════════════
Risk per Trade:     {:.1}%
Max Position Size:  {:.1}% of equity
Max Portfolio Heat: {:.1}%
Max Drawdown:       {:.1}%
Max Positions:      {}
Stop Loss Method:   {}
Stop Loss:          {:.1}%
ATR Multiplier:     {}
"#,
            title,
            self.risk_per_trade * hundred,
            self.max_position_pct * hundred,
            self.portfolio_heat_limit * hundred,
            self.max_drawdown * hundred,
            self.max_positions,
            self.stop_loss_method,
            self.stop_loss_pct * hundred,
            self.atr_multiplier,
        )
    }
}
