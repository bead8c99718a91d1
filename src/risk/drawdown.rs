//! Drawdown protection
//!
//! Tracks the equity high-water mark and maps the current drawdown onto a
//! protection level that throttles or halts new entries.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Protection level, ordered from least to most restrictive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionLevel {
    /// Trade at full size
    Normal,
    /// Drawdown noticeable, still full size
    Warning,
    /// Half-size entries
    RiskReduction,
    /// No new entries; existing stops and exits still run
    StopTrading,
}

impl ProtectionLevel {
    /// Multiplier applied to computed position size
    pub fn size_multiplier(&self) -> Decimal {
        match self {
            ProtectionLevel::Normal | ProtectionLevel::Warning => Decimal::ONE,
            ProtectionLevel::RiskReduction => dec!(0.5),
            ProtectionLevel::StopTrading => Decimal::ZERO,
        }
    }

    pub fn allows_entries(&self) -> bool {
        *self != ProtectionLevel::StopTrading
    }

    /// Numeric code for gauges (0 = normal .. 3 = halted)
    pub fn code(&self) -> u8 {
        match self {
            ProtectionLevel::Normal => 0,
            ProtectionLevel::Warning => 1,
            ProtectionLevel::RiskReduction => 2,
            ProtectionLevel::StopTrading => 3,
        }
    }
}

/// Drawdown state machine for one session
///
/// Warning starts at one third of `max_drawdown`, risk reduction at two
/// thirds, and entries stop at `max_drawdown` itself. The level is recomputed
/// from peak and current equity on every update.
#[derive(Debug, Clone)]
pub struct DrawdownProtector {
    max_drawdown: Decimal,
    peak_equity: Decimal,
    current_equity: Decimal,
    current_drawdown: Decimal,
    level: ProtectionLevel,
}

impl DrawdownProtector {
    /// Create a protector with peak equity zero
    pub fn new(max_drawdown: Decimal) -> Self {
        Self {
            max_drawdown,
            peak_equity: dec!(0),
            current_equity: dec!(0),
            current_drawdown: dec!(0),
            level: ProtectionLevel::Normal,
        }
    }

    /// Feed the latest mark-to-market equity
    pub fn update(&mut self, current_equity: Decimal) -> ProtectionLevel {
        let previous = self.level;
        self.current_equity = current_equity;

        if current_equity > self.peak_equity {
            self.peak_equity = current_equity;
            self.current_drawdown = dec!(0);
            self.level = ProtectionLevel::Normal;
        } else {
            self.current_drawdown = if self.peak_equity == dec!(0) {
                dec!(0)
            } else {
                (self.peak_equity - current_equity) / self.peak_equity
            };
            self.level = self.level_for(self.current_drawdown);
        }

        if self.level > previous {
            tracing::warn!(
                from = ?previous,
                to = ?self.level,
                drawdown = %self.current_drawdown,
                peak_equity = %self.peak_equity,
                "Drawdown protection escalated"
            );
        } else if self.level < previous {
            tracing::info!(
                from = ?previous,
                to = ?self.level,
                drawdown = %self.current_drawdown,
                "Drawdown protection relaxed"
            );
        }

        self.level
    }

    /// Level for a given drawdown fraction
    pub fn level_for(&self, drawdown: Decimal) -> ProtectionLevel {
        if drawdown >= self.max_drawdown {
            ProtectionLevel::StopTrading
        } else if drawdown >= self.reduction_threshold() {
            ProtectionLevel::RiskReduction
        } else if drawdown >= self.warning_threshold() {
            ProtectionLevel::Warning
        } else {
            ProtectionLevel::Normal
        }
    }

    pub fn warning_threshold(&self) -> Decimal {
        self.max_drawdown / dec!(3)
    }

    pub fn reduction_threshold(&self) -> Decimal {
        self.max_drawdown * dec!(2) / dec!(3)
    }

    pub fn level(&self) -> ProtectionLevel {
        self.level
    }

    pub fn size_multiplier(&self) -> Decimal {
        self.level.size_multiplier()
    }

    pub fn can_trade(&self) -> bool {
        self.level.allows_entries()
    }

    pub fn peak_equity(&self) -> Decimal {
        self.peak_equity
    }

    /// Equity from the most recent update
    pub fn current_equity(&self) -> Decimal {
        self.current_equity
    }

    pub fn current_drawdown(&self) -> Decimal {
        self.current_drawdown
    }

    pub fn max_drawdown(&self) -> Decimal {
        self.max_drawdown
    }
}
