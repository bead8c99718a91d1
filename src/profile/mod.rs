//! Risk profile registry
//!
//! Static risk parameters keyed by strategy archetype and risk appetite,
//! plus a validating builder for custom profiles.

mod builder;
mod registry;
mod types;

pub use builder::{
    RiskConfigBuilder, MAX_ATR_MULTIPLIER, MAX_DRAWDOWN_LIMIT, MAX_HEAT_LIMIT, MAX_RISK_PER_TRADE,
};
pub use registry::{all_profiles, get_config, lookup, ProfileEntry};
pub use types::{RiskAppetite, RiskConfig, StopLossMethod, StrategyArchetype};
