//! Portfolio heat monitoring
//!
//! Heat is the fraction of equity that would be lost if every open position
//! hit its stop. New entries are admitted only while projected heat stays
//! within the profile limit.

use super::{OpenPosition, PositionId, RejectionReason, RiskError};
use crate::profile::RiskConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Heat relative to the profile limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatStatus {
    Normal,
    /// At or above 80% of the limit
    Warning,
    /// At or above the limit
    Critical,
}

/// Fraction of the heat limit at which status turns to warning
pub const HEAT_WARNING_RATIO: Decimal = dec!(0.8);

/// Projected heat reported when there is no equity to divide by
pub const UNBOUNDED_HEAT: Decimal = Decimal::MAX;

/// Tracks capital at risk across open positions
#[derive(Debug, Default)]
pub struct PortfolioHeatMonitor {
    positions: HashMap<PositionId, OpenPosition>,
}

impl PortfolioHeatMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of risk amounts over open positions
    pub fn total_risk(&self) -> Decimal {
        self.positions
            .values()
            .fold(dec!(0), |acc, p| acc.saturating_add(p.risk_amount))
    }

    /// Aggregate risk as a fraction of account value
    pub fn current_heat(&self, account_value: Decimal) -> Decimal {
        if account_value <= dec!(0) {
            return dec!(0);
        }
        self.total_risk()
            .checked_div(account_value)
            .unwrap_or(UNBOUNDED_HEAT)
    }

    /// Pre-trade gate; position count is checked before heat
    pub fn check_admission(
        &self,
        candidate_risk: Decimal,
        account_value: Decimal,
        config: &RiskConfig,
    ) -> Result<(), RejectionReason> {
        let open = self.open_count();
        if open >= config.max_positions() {
            return Err(RejectionReason::PositionCountExceeded {
                open,
                max: config.max_positions(),
            });
        }

        let limit = config.portfolio_heat_limit();
        if account_value <= dec!(0) {
            return Err(RejectionReason::HeatLimitExceeded {
                projected_heat: UNBOUNDED_HEAT,
                limit,
            });
        }

        let projected_heat = self
            .total_risk()
            .saturating_add(candidate_risk)
            .checked_div(account_value)
            .unwrap_or(UNBOUNDED_HEAT);
        if projected_heat > limit {
            return Err(RejectionReason::HeatLimitExceeded {
                projected_heat,
                limit,
            });
        }

        Ok(())
    }

    /// True iff a candidate with this risk would be admitted
    pub fn can_admit(
        &self,
        candidate_risk: Decimal,
        account_value: Decimal,
        config: &RiskConfig,
    ) -> bool {
        self.check_admission(candidate_risk, account_value, config)
            .is_ok()
    }

    /// Start tracking a filled position
    pub fn register(&mut self, position: OpenPosition) -> Result<(), RiskError> {
        if self.positions.contains_key(&position.id) {
            return Err(RiskError::DuplicatePosition(position.id));
        }
        self.positions.insert(position.id, position);
        Ok(())
    }

    /// Stop tracking a closed position
    pub fn release(&mut self, id: PositionId) -> Result<OpenPosition, RiskError> {
        self.positions
            .remove(&id)
            .ok_or(RiskError::UnknownPosition(id))
    }

    pub fn heat_status(&self, account_value: Decimal, config: &RiskConfig) -> HeatStatus {
        let heat = self.current_heat(account_value);
        let limit = config.portfolio_heat_limit();
        if heat >= limit {
            HeatStatus::Critical
        } else if heat >= limit * HEAT_WARNING_RATIO {
            HeatStatus::Warning
        } else {
            HeatStatus::Normal
        }
    }

    pub fn get(&self, id: &PositionId) -> Option<&OpenPosition> {
        self.positions.get(id)
    }

    pub fn positions(&self) -> impl Iterator<Item = &OpenPosition> {
        self.positions.values()
    }

    pub fn open_count(&self) -> usize {
        self.positions.len()
    }
}
