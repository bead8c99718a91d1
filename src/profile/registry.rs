//! Built-in risk profiles
//!
//! A compile-time table keyed by (archetype, appetite). Appetite sets the
//! broad envelope (heat, drawdown, position count); the archetype picks the
//! stop method and tunes per-trade risk and stop width.

use super::types::{RiskAppetite, RiskConfig, StopLossMethod, StrategyArchetype};
use crate::risk::RiskError;
use rust_decimal_macros::dec;
use serde::Serialize;

/// One row of the registry
#[derive(Debug, Serialize)]
pub struct ProfileEntry {
    pub archetype: StrategyArchetype,
    pub appetite: RiskAppetite,
    pub config: RiskConfig,
}

const fn entry(
    archetype: StrategyArchetype,
    appetite: RiskAppetite,
    config: RiskConfig,
) -> ProfileEntry {
    ProfileEntry {
        archetype,
        appetite,
        config,
    }
}

use RiskAppetite::{Aggressive, Conservative, Moderate};
use StrategyArchetype::{BuyHold, MeanReversion, Momentum, TrendFollowing};

static PROFILES: [ProfileEntry; 12] = [
    // Trend following: volatility-scaled stops
    entry(
        TrendFollowing,
        Conservative,
        RiskConfig {
            risk_per_trade: dec!(0.015),
            max_position_pct: dec!(0.12),
            max_positions: 2,
            max_drawdown: dec!(0.12),
            portfolio_heat_limit: dec!(0.08),
            stop_loss_method: StopLossMethod::Atr,
            stop_loss_pct: dec!(0.03),
            atr_multiplier: dec!(1.5),
        },
    ),
    entry(
        TrendFollowing,
        Moderate,
        RiskConfig {
            risk_per_trade: dec!(0.02),
            max_position_pct: dec!(0.15),
            max_positions: 3,
            max_drawdown: dec!(0.15),
            portfolio_heat_limit: dec!(0.10),
            stop_loss_method: StopLossMethod::Atr,
            stop_loss_pct: dec!(0.04),
            atr_multiplier: dec!(2.0),
        },
    ),
    entry(
        TrendFollowing,
        Aggressive,
        RiskConfig {
            risk_per_trade: dec!(0.025),
            max_position_pct: dec!(0.20),
            max_positions: 4,
            max_drawdown: dec!(0.18),
            portfolio_heat_limit: dec!(0.12),
            stop_loss_method: StopLossMethod::Atr,
            stop_loss_pct: dec!(0.05),
            atr_multiplier: dec!(2.5),
        },
    ),
    // Mean reversion: tighter percentage stops, lower per-trade risk
    entry(
        MeanReversion,
        Conservative,
        RiskConfig {
            risk_per_trade: dec!(0.012),
            max_position_pct: dec!(0.12),
            max_positions: 2,
            max_drawdown: dec!(0.12),
            portfolio_heat_limit: dec!(0.08),
            stop_loss_method: StopLossMethod::Percentage,
            stop_loss_pct: dec!(0.025),
            atr_multiplier: dec!(1.5),
        },
    ),
    entry(
        MeanReversion,
        Moderate,
        RiskConfig {
            risk_per_trade: dec!(0.015),
            max_position_pct: dec!(0.15),
            max_positions: 3,
            max_drawdown: dec!(0.15),
            portfolio_heat_limit: dec!(0.10),
            stop_loss_method: StopLossMethod::Percentage,
            stop_loss_pct: dec!(0.03),
            atr_multiplier: dec!(2.0),
        },
    ),
    entry(
        MeanReversion,
        Aggressive,
        RiskConfig {
            risk_per_trade: dec!(0.02),
            max_position_pct: dec!(0.20),
            max_positions: 4,
            max_drawdown: dec!(0.18),
            portfolio_heat_limit: dec!(0.12),
            stop_loss_method: StopLossMethod::Percentage,
            stop_loss_pct: dec!(0.04),
            atr_multiplier: dec!(2.5),
        },
    ),
    // Momentum: wider stops, slightly higher per-trade risk
    entry(
        Momentum,
        Conservative,
        RiskConfig {
            risk_per_trade: dec!(0.018),
            max_position_pct: dec!(0.12),
            max_positions: 2,
            max_drawdown: dec!(0.12),
            portfolio_heat_limit: dec!(0.08),
            stop_loss_method: StopLossMethod::Percentage,
            stop_loss_pct: dec!(0.04),
            atr_multiplier: dec!(1.5),
        },
    ),
    entry(
        Momentum,
        Moderate,
        RiskConfig {
            risk_per_trade: dec!(0.022),
            max_position_pct: dec!(0.15),
            max_positions: 3,
            max_drawdown: dec!(0.15),
            portfolio_heat_limit: dec!(0.10),
            stop_loss_method: StopLossMethod::Percentage,
            stop_loss_pct: dec!(0.05),
            atr_multiplier: dec!(2.0),
        },
    ),
    entry(
        Momentum,
        Aggressive,
        RiskConfig {
            risk_per_trade: dec!(0.028),
            max_position_pct: dec!(0.20),
            max_positions: 4,
            max_drawdown: dec!(0.18),
            portfolio_heat_limit: dec!(0.12),
            stop_loss_method: StopLossMethod::Percentage,
            stop_loss_pct: dec!(0.06),
            atr_multiplier: dec!(2.5),
        },
    ),
    // Buy and hold: few, large positions with wide stops
    entry(
        BuyHold,
        Conservative,
        RiskConfig {
            risk_per_trade: dec!(0.02),
            max_position_pct: dec!(0.25),
            max_positions: 1,
            max_drawdown: dec!(0.12),
            portfolio_heat_limit: dec!(0.08),
            stop_loss_method: StopLossMethod::Percentage,
            stop_loss_pct: dec!(0.08),
            atr_multiplier: dec!(1.5),
        },
    ),
    entry(
        BuyHold,
        Moderate,
        RiskConfig {
            risk_per_trade: dec!(0.025),
            max_position_pct: dec!(0.30),
            max_positions: 1,
            max_drawdown: dec!(0.15),
            portfolio_heat_limit: dec!(0.10),
            stop_loss_method: StopLossMethod::Percentage,
            stop_loss_pct: dec!(0.10),
            atr_multiplier: dec!(2.0),
        },
    ),
    entry(
        BuyHold,
        Aggressive,
        RiskConfig {
            risk_per_trade: dec!(0.03),
            max_position_pct: dec!(0.35),
            max_positions: 2,
            max_drawdown: dec!(0.18),
            portfolio_heat_limit: dec!(0.12),
            stop_loss_method: StopLossMethod::Percentage,
            stop_loss_pct: dec!(0.12),
            atr_multiplier: dec!(2.5),
        },
    ),
];

/// Look up the registered row for a pair
pub fn lookup(archetype: StrategyArchetype, appetite: RiskAppetite) -> Option<&'static RiskConfig> {
    PROFILES
        .iter()
        .find(|e| e.archetype == archetype && e.appetite == appetite)
        .map(|e| &e.config)
}

/// Get the risk configuration for a strategy archetype and appetite
pub fn get_config(
    archetype: StrategyArchetype,
    appetite: RiskAppetite,
) -> Result<RiskConfig, RiskError> {
    lookup(archetype, appetite)
        .cloned()
        .ok_or(RiskError::UnknownProfile {
            archetype,
            appetite,
        })
}

/// Every registered profile, in table order
pub fn all_profiles() -> &'static [ProfileEntry] {
    &PROFILES
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::RiskConfigBuilder;

    #[test]
    fn test_every_pair_registered() {
        for archetype in StrategyArchetype::ALL {
            for appetite in RiskAppetite::ALL {
                assert!(
                    get_config(archetype, appetite).is_ok(),
                    "missing {archetype}/{appetite}"
                );
            }
        }
        assert_eq!(all_profiles().len(), 12);
    }

    #[test]
    fn test_no_duplicate_rows() {
        for (i, a) in all_profiles().iter().enumerate() {
            for b in &all_profiles()[i + 1..] {
                assert!(!(a.archetype == b.archetype && a.appetite == b.appetite));
            }
        }
    }

    #[test]
    fn test_moderate_trend_following() {
        let config = get_config(TrendFollowing, Moderate).unwrap();
        assert_eq!(config.risk_per_trade(), dec!(0.02));
        assert_eq!(config.max_position_pct(), dec!(0.15));
        assert_eq!(config.max_positions(), 3);
        assert_eq!(config.max_drawdown(), dec!(0.15));
        assert_eq!(config.portfolio_heat_limit(), dec!(0.10));
        assert_eq!(config.stop_loss_method(), StopLossMethod::Atr);
        assert_eq!(config.stop_loss_pct(), dec!(0.04));
        assert_eq!(config.atr_multiplier(), dec!(2.0));
    }

    #[test]
    fn test_appetite_ordering() {
        let c = get_config(TrendFollowing, Conservative).unwrap();
        let m = get_config(TrendFollowing, Moderate).unwrap();
        let a = get_config(TrendFollowing, Aggressive).unwrap();

        assert_eq!(c.risk_per_trade(), dec!(0.015));
        assert_eq!(c.portfolio_heat_limit(), dec!(0.08));
        assert_eq!(c.max_drawdown(), dec!(0.12));
        assert_eq!(a.risk_per_trade(), dec!(0.025));
        assert_eq!(a.portfolio_heat_limit(), dec!(0.12));
        assert_eq!(a.max_drawdown(), dec!(0.18));

        for archetype in StrategyArchetype::ALL {
            let c = get_config(archetype, Conservative).unwrap();
            let m = get_config(archetype, Moderate).unwrap();
            let a = get_config(archetype, Aggressive).unwrap();
            assert!(c.risk_per_trade() < m.risk_per_trade());
            assert!(m.risk_per_trade() < a.risk_per_trade());
            assert!(c.portfolio_heat_limit() < a.portfolio_heat_limit());
            assert!(c.max_drawdown() < a.max_drawdown());
        }
        assert!(m.max_positions() > c.max_positions());
    }

    #[test]
    fn test_buy_hold_shape() {
        for appetite in RiskAppetite::ALL {
            let config = get_config(BuyHold, appetite).unwrap();
            assert!(config.max_position_pct() >= dec!(0.25));
            assert!(config.max_position_pct() <= dec!(0.35));
            assert!(config.stop_loss_pct() >= dec!(0.08));
            assert!(config.stop_loss_pct() <= dec!(0.12));
            assert!((1..=2).contains(&config.max_positions()));
        }
    }

    #[test]
    fn test_builtin_rows_pass_validation() {
        for e in all_profiles() {
            let rebuilt = RiskConfigBuilder::from_config(e.config.clone()).build();
            assert_eq!(rebuilt.unwrap(), e.config);
            assert!(e.config.risk_per_trade() <= e.config.portfolio_heat_limit());
        }
    }
}
