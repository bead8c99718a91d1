//! Risk management types

use super::ProtectionLevel;
use crate::profile::{RiskAppetite, StrategyArchetype};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Identifier of an open position
pub type PositionId = Uuid;

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn is_long(&self) -> bool {
        matches!(self, Side::Long)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => f.write_str("long"),
            Side::Short => f.write_str("short"),
        }
    }
}

/// Risk management errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RiskError {
    /// No registered profile for the pair
    #[error("No risk profile registered for {archetype}/{appetite}")]
    UnknownProfile {
        archetype: StrategyArchetype,
        appetite: RiskAppetite,
    },
    /// Custom profile outside safe bounds
    #[error("Invalid risk configuration: {0}")]
    InvalidConfig(String),
    /// Non-positive or inconsistent price input
    #[error("Invalid {field}: {value}")]
    InvalidPrice { field: &'static str, value: Decimal },
    /// Non-positive quantity
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(Decimal),
    /// Negative volatility ratio
    #[error("Invalid volatility: {0}")]
    InvalidVolatility(Decimal),
    /// Intermediate value outside the representable range
    #[error("Arithmetic overflow computing {0}")]
    Overflow(&'static str),
    /// Support/resistance stop requested without a level
    #[error("No technical level supplied for support/resistance stop")]
    NoTechnicalLevel,
    /// Position id registered twice
    #[error("Position already registered: {0}")]
    DuplicatePosition(PositionId),
    /// Release of an id that is not open
    #[error("Unknown position: {0}")]
    UnknownPosition(PositionId),
}

/// Broad class of a [`RiskError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fatal at construction
    Configuration,
    /// Bad input to a calculator; surfaces as a rejection
    Validation,
    /// Register/release bookkeeping mismatch
    StateConsistency,
}

impl RiskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RiskError::UnknownProfile { .. } | RiskError::InvalidConfig(_) => {
                ErrorKind::Configuration
            }
            RiskError::InvalidPrice { .. }
            | RiskError::InvalidQuantity(_)
            | RiskError::InvalidVolatility(_)
            | RiskError::Overflow(_)
            | RiskError::NoTechnicalLevel => ErrorKind::Validation,
            RiskError::DuplicatePosition(_) | RiskError::UnknownPosition(_) => {
                ErrorKind::StateConsistency
            }
        }
    }
}

/// Why a candidate trade was not approved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RejectionReason {
    /// Drawdown protection has halted new entries
    CircuitBreakerActive(Decimal),
    /// Sized quantity is below one tradable unit
    SizeTooSmall,
    /// Admitting the trade would breach the heat limit
    HeatLimitExceeded { projected_heat: Decimal, limit: Decimal },
    /// Maximum concurrent positions reached
    PositionCountExceeded { open: usize, max: usize },
    /// Stop or size computation rejected the inputs
    InvalidInput(String),
}

impl RejectionReason {
    /// Stable label for logs and metrics
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::CircuitBreakerActive(_) => "circuit_breaker_active",
            RejectionReason::SizeTooSmall => "size_too_small",
            RejectionReason::HeatLimitExceeded { .. } => "heat_limit_exceeded",
            RejectionReason::PositionCountExceeded { .. } => "position_count_exceeded",
            RejectionReason::InvalidInput(_) => "invalid_input",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::CircuitBreakerActive(dd) => {
                write!(f, "circuit breaker active at {:.2}% drawdown", *dd * Decimal::ONE_HUNDRED)
            }
            RejectionReason::SizeTooSmall => f.write_str("position size below one tradable unit"),
            RejectionReason::HeatLimitExceeded {
                projected_heat,
                limit,
            } => write!(f, "portfolio heat {projected_heat:.4} would exceed {limit}"),
            RejectionReason::PositionCountExceeded { open, max } => {
                write!(f, "{open} of {max} positions already open")
            }
            RejectionReason::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

/// An approved entry
///
/// `size` is a ceiling: if the fill is partial, register the filled quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovedTrade {
    /// Quantity to order
    pub size: Decimal,
    /// Protective stop price
    pub stop_price: Decimal,
    /// Capital at risk at `size`
    pub risk_amount: Decimal,
    /// Protection level at decision time
    pub protection_level: ProtectionLevel,
}

/// Result of a pre-trade risk check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TradeDecision {
    Approved(ApprovedTrade),
    Rejected(RejectionReason),
}

impl TradeDecision {
    pub fn is_approved(&self) -> bool {
        matches!(self, TradeDecision::Approved(_))
    }

    pub fn approved(&self) -> Option<&ApprovedTrade> {
        match self {
            TradeDecision::Approved(trade) => Some(trade),
            TradeDecision::Rejected(_) => None,
        }
    }

    pub fn rejection_reason(&self) -> Option<&RejectionReason> {
        match self {
            TradeDecision::Approved(_) => None,
            TradeDecision::Rejected(reason) => Some(reason),
        }
    }

    /// Approved quantity, zero when rejected
    pub fn size(&self) -> Decimal {
        self.approved().map_or(Decimal::ZERO, |t| t.size)
    }
}
