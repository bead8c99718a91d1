//! Position sizing
//!
//! Converts a per-trade risk budget and the entry/stop distance into a
//! tradable quantity, capped by the profile's maximum position notional.

use super::RiskError;
use crate::profile::RiskConfig;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Largest decimal scale a lot step can have
pub const MAX_LOT_DECIMALS: u32 = 28;

/// Smallest volatility size factor
pub const MIN_VOLATILITY_FACTOR: Decimal = dec!(0.5);

/// Tradable granularity of the instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotSize {
    /// Quantities are rounded down to a multiple of this
    pub step: Decimal,
    /// Smallest quantity worth ordering
    pub min_quantity: Decimal,
}

impl LotSize {
    /// Whole units only (shares, contracts)
    pub const fn whole() -> Self {
        Self {
            step: dec!(1),
            min_quantity: dec!(1),
        }
    }

    /// Fractional units with the given number of decimals
    ///
    /// # Errors
    ///
    /// `RiskError::InvalidConfig` if `decimals` exceeds [`MAX_LOT_DECIMALS`].
    pub fn fractional(decimals: u32) -> Result<Self, RiskError> {
        if decimals > MAX_LOT_DECIMALS {
            return Err(RiskError::InvalidConfig(format!(
                "lot decimals must be at most {MAX_LOT_DECIMALS}, got {decimals}"
            )));
        }
        let step = Decimal::new(1, decimals);
        Ok(Self {
            step,
            min_quantity: step.max(dec!(0.001)),
        })
    }

    /// Override the minimum order quantity
    pub fn with_min_quantity(mut self, min_quantity: Decimal) -> Self {
        self.min_quantity = min_quantity;
        self
    }

    /// Round down to a multiple of the step
    pub fn round_down(&self, quantity: Decimal) -> Decimal {
        if quantity <= dec!(0) {
            return dec!(0);
        }
        match quantity.checked_div(self.step) {
            Some(units) => (units.floor() * self.step).normalize(),
            None => quantity
                .round_dp_with_strategy(self.step.scale(), RoundingStrategy::ToZero)
                .normalize(),
        }
    }

    /// Round down and zero anything below the minimum
    pub fn tradable(&self, quantity: Decimal) -> Decimal {
        let rounded = self.round_down(quantity);
        if rounded < self.min_quantity {
            dec!(0)
        } else {
            rounded
        }
    }
}

impl Default for LotSize {
    fn default() -> Self {
        Self::whole()
    }
}

/// Risk-budget position sizer
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionSizer {
    lot: LotSize,
}

impl PositionSizer {
    pub fn new(lot: LotSize) -> Self {
        Self { lot }
    }

    pub fn lot(&self) -> LotSize {
        self.lot
    }

    /// Quantity that risks `risk_per_trade` of equity between entry and stop
    ///
    /// Returns zero when the account is empty, the stop equals the entry, or
    /// the result is below one tradable unit.
    ///
    /// # Errors
    ///
    /// `RiskError::InvalidPrice` if `entry_price` is not positive.
    pub fn calculate_size(
        &self,
        account_value: Decimal,
        entry_price: Decimal,
        stop_price: Decimal,
        config: &RiskConfig,
    ) -> Result<Decimal, RiskError> {
        if entry_price <= dec!(0) {
            return Err(RiskError::InvalidPrice {
                field: "entry_price",
                value: entry_price,
            });
        }
        if account_value <= dec!(0) {
            return Ok(dec!(0));
        }

        let risk_per_unit = (entry_price - stop_price).abs();
        if risk_per_unit == dec!(0) {
            return Ok(dec!(0));
        }

        let risk_amount = account_value * config.risk_per_trade();
        let ideal_qty = risk_amount
            .checked_div(risk_per_unit)
            .ok_or(RiskError::Overflow("risk budget quantity"))?;
        let cap_qty = (account_value * config.max_position_pct())
            .checked_div(entry_price)
            .ok_or(RiskError::Overflow("position cap quantity"))?;

        Ok(self
            .lot
            .tradable(self.lot.round_down(ideal_qty).min(self.lot.round_down(cap_qty))))
    }
}

/// Size factor for a volatility ratio (1 = normal volatility)
///
/// Shrinks linearly above normal, down to [`MIN_VOLATILITY_FACTOR`] at twice
/// normal. Never above 1, so calm markets do not enlarge the risk budget.
///
/// # Errors
///
/// `RiskError::InvalidVolatility` for a negative ratio.
pub fn volatility_factor(volatility: Decimal) -> Result<Decimal, RiskError> {
    if volatility < dec!(0) {
        return Err(RiskError::InvalidVolatility(volatility));
    }
    Ok((dec!(2) - volatility).clamp(MIN_VOLATILITY_FACTOR, Decimal::ONE))
}
