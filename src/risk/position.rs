//! Open position risk records

use super::{PositionId, RiskError, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Capital at risk for one open position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    /// Position identifier
    pub id: PositionId,
    /// Fill price
    pub entry_price: Decimal,
    /// Protective stop
    pub stop_price: Decimal,
    /// Filled quantity
    pub quantity: Decimal,
    /// Direction
    pub side: Side,
    /// quantity × |entry − stop|
    pub risk_amount: Decimal,
    /// Fill timestamp
    pub opened_at: DateTime<Utc>,
}

impl OpenPosition {
    /// Build a record from a fill, deriving the risk amount
    pub fn new(
        id: PositionId,
        entry_price: Decimal,
        stop_price: Decimal,
        quantity: Decimal,
        side: Side,
    ) -> Result<Self, RiskError> {
        Self::opened_at(id, entry_price, stop_price, quantity, side, Utc::now())
    }

    /// Same as [`OpenPosition::new`] with an explicit fill time
    pub fn opened_at(
        id: PositionId,
        entry_price: Decimal,
        stop_price: Decimal,
        quantity: Decimal,
        side: Side,
        opened_at: DateTime<Utc>,
    ) -> Result<Self, RiskError> {
        if entry_price <= Decimal::ZERO {
            return Err(RiskError::InvalidPrice {
                field: "entry_price",
                value: entry_price,
            });
        }
        if stop_price < Decimal::ZERO {
            return Err(RiskError::InvalidPrice {
                field: "stop_price",
                value: stop_price,
            });
        }
        if quantity <= Decimal::ZERO {
            return Err(RiskError::InvalidQuantity(quantity));
        }

        let risk_amount = quantity
            .checked_mul((entry_price - stop_price).abs())
            .ok_or(RiskError::Overflow("position risk amount"))?;

        Ok(Self {
            id,
            entry_price,
            stop_price,
            quantity,
            side,
            risk_amount,
            opened_at,
        })
    }

    /// Notional value at entry
    pub fn notional(&self) -> Decimal {
        self.quantity.saturating_mul(self.entry_price)
    }
}
