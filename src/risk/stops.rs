//! Stop-loss placement

use super::{RiskError, Side};
use crate::profile::{RiskConfig, StopLossMethod};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Computes protective stop prices
///
/// Stateless: identical inputs always give the same stop.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopLossCalculator;

impl StopLossCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Stop price for an entry
    ///
    /// `Atr` without an ATR value falls back to `Percentage`.
    /// `SupportResistance` needs `technical_level` and never falls back.
    ///
    /// # Errors
    ///
    /// - `RiskError::InvalidPrice` for a non-positive entry or ATR, a level on
    ///   the wrong side of the entry, or a long stop at or below zero
    /// - `RiskError::NoTechnicalLevel` for `SupportResistance` without a level
    pub fn get_stop_price(
        &self,
        entry_price: Decimal,
        side: Side,
        method: StopLossMethod,
        config: &RiskConfig,
        atr_value: Option<Decimal>,
        technical_level: Option<Decimal>,
    ) -> Result<Decimal, RiskError> {
        if entry_price <= dec!(0) {
            return Err(RiskError::InvalidPrice {
                field: "entry_price",
                value: entry_price,
            });
        }

        let stop = match method {
            StopLossMethod::Percentage => percentage_stop(entry_price, side, config)?,
            StopLossMethod::Atr => match atr_value {
                Some(atr) if atr <= dec!(0) => {
                    return Err(RiskError::InvalidPrice {
                        field: "atr_value",
                        value: atr,
                    });
                }
                Some(atr) => {
                    let distance = atr
                        .checked_mul(config.atr_multiplier())
                        .ok_or(RiskError::Overflow("atr stop distance"))?;
                    match side {
                        Side::Long => entry_price - distance,
                        Side::Short => entry_price
                            .checked_add(distance)
                            .ok_or(RiskError::Overflow("atr stop distance"))?,
                    }
                }
                None => {
                    tracing::debug!("No ATR value, using percentage stop");
                    percentage_stop(entry_price, side, config)?
                }
            },
            StopLossMethod::SupportResistance => {
                let level = technical_level.ok_or(RiskError::NoTechnicalLevel)?;
                let wrong_side = match side {
                    Side::Long => level >= entry_price,
                    Side::Short => level <= entry_price,
                };
                if wrong_side {
                    return Err(RiskError::InvalidPrice {
                        field: "technical_level",
                        value: level,
                    });
                }
                level
            }
        };

        if stop <= dec!(0) {
            return Err(RiskError::InvalidPrice {
                field: "stop_price",
                value: stop,
            });
        }

        Ok(stop)
    }
}

fn percentage_stop(
    entry_price: Decimal,
    side: Side,
    config: &RiskConfig,
) -> Result<Decimal, RiskError> {
    let factor = match side {
        Side::Long => dec!(1) - config.stop_loss_pct(),
        Side::Short => dec!(1) + config.stop_loss_pct(),
    };
    entry_price
        .checked_mul(factor)
        .ok_or(RiskError::Overflow("percentage stop"))
}
