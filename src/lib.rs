//! riskguard: per-session trade and portfolio risk engine
//!
//! This library provides the core components for:
//! - Built-in risk profiles keyed by strategy archetype and risk appetite
//! - Validated custom profiles
//! - Risk-budget position sizing with lot rounding
//! - Percentage, ATR and support/resistance stop placement
//! - Portfolio heat gating of concurrent positions
//! - Drawdown-based protection levels
//! - Structured logging and risk metrics

pub mod cli;
pub mod config;
pub mod profile;
pub mod risk;
pub mod telemetry;
