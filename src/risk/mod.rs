//! Risk management module
//!
//! Position sizing, stop placement, heat gating and drawdown protection for
//! one strategy session.

mod drawdown;
mod heat;
mod manager;
mod position;
mod sizing;
mod stops;
mod types;

pub use drawdown::{DrawdownProtector, ProtectionLevel};
pub use heat::{HeatStatus, PortfolioHeatMonitor, HEAT_WARNING_RATIO, UNBOUNDED_HEAT};
pub use manager::{BookkeepingPolicy, RiskManager, RiskMetrics, TradeCandidate};
pub use position::OpenPosition;
pub use sizing::{
    volatility_factor, LotSize, PositionSizer, MAX_LOT_DECIMALS, MIN_VOLATILITY_FACTOR,
};
pub use stops::StopLossCalculator;
pub use types::{
    ApprovedTrade, ErrorKind, PositionId, RejectionReason, RiskError, Side, TradeDecision,
};
