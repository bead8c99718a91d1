//! Per-session risk orchestration
//!
//! `RiskManager` is the single entry point for the bar loop. It owns the
//! drawdown protector and heat monitor for one strategy session and turns a
//! candidate entry into an approve/reject decision.

use super::{
    volatility_factor, ApprovedTrade, DrawdownProtector, HeatStatus, LotSize, OpenPosition,
    PortfolioHeatMonitor, PositionId, PositionSizer, ProtectionLevel, RejectionReason, RiskError,
    Side, StopLossCalculator, TradeDecision,
};
use crate::profile::{get_config, RiskAppetite, RiskConfig, StopLossMethod, StrategyArchetype};
use crate::telemetry::{self, CounterMetric, GaugeMetric};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// How register/release mismatches are handled
///
/// Test and debug harnesses should run `Strict` so a double release or a
/// mismatched id fails loudly; production loops default to `Lenient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookkeepingPolicy {
    /// Log unknown releases and continue
    #[default]
    Lenient,
    /// Return unknown releases as errors
    Strict,
}

/// A candidate entry from the signal layer
#[derive(Debug, Clone, PartialEq)]
pub struct TradeCandidate {
    pub entry_price: Decimal,
    pub side: Side,
    /// Current mark-to-market equity
    pub account_value: Decimal,
    pub atr_value: Option<Decimal>,
    /// Support/resistance level for level-based stops
    pub technical_level: Option<Decimal>,
    /// Overrides the profile's stop method for this trade
    pub stop_method: Option<StopLossMethod>,
    /// Current volatility relative to normal (1 = normal)
    pub volatility: Option<Decimal>,
}

impl TradeCandidate {
    pub fn new(entry_price: Decimal, side: Side, account_value: Decimal) -> Self {
        Self {
            entry_price,
            side,
            account_value,
            atr_value: None,
            technical_level: None,
            stop_method: None,
            volatility: None,
        }
    }

    pub fn with_atr(mut self, atr: Decimal) -> Self {
        self.atr_value = Some(atr);
        self
    }

    pub fn with_technical_level(mut self, level: Decimal) -> Self {
        self.technical_level = Some(level);
        self
    }

    pub fn with_stop_method(mut self, method: StopLossMethod) -> Self {
        self.stop_method = Some(method);
        self
    }

    /// Shrink the size when volatility runs above normal
    pub fn with_volatility(mut self, volatility: Decimal) -> Self {
        self.volatility = Some(volatility);
        self
    }
}

/// Snapshot of session risk state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Equity from the latest update
    pub account_value: Decimal,
    pub peak_equity: Decimal,
    pub current_drawdown: Decimal,
    pub protection_level: ProtectionLevel,
    pub current_heat: Decimal,
    pub heat_status: HeatStatus,
    /// current_heat / portfolio_heat_limit
    pub risk_utilization: Decimal,
    pub active_positions: usize,
    pub max_positions: usize,
    pub total_trades: u64,
    pub winning_trades: u64,
    /// Fraction of closed trades with positive P&L
    pub win_rate: Decimal,
}

/// Risk engine for one strategy session
#[derive(Debug)]
pub struct RiskManager {
    config: RiskConfig,
    sizer: PositionSizer,
    stops: StopLossCalculator,
    heat: PortfolioHeatMonitor,
    drawdown: DrawdownProtector,
    bookkeeping: BookkeepingPolicy,
    total_trades: u64,
    winning_trades: u64,
}

impl RiskManager {
    /// Create a manager from the registered profile for a pair
    pub fn new(archetype: StrategyArchetype, appetite: RiskAppetite) -> Result<Self, RiskError> {
        let config = get_config(archetype, appetite)?;
        tracing::info!(%archetype, %appetite, "Risk profile selected");
        Ok(Self::with_config(config))
    }

    /// Create a manager from an explicit (already validated) config
    pub fn with_config(config: RiskConfig) -> Self {
        Self {
            drawdown: DrawdownProtector::new(config.max_drawdown()),
            heat: PortfolioHeatMonitor::new(),
            sizer: PositionSizer::default(),
            stops: StopLossCalculator::new(),
            bookkeeping: BookkeepingPolicy::default(),
            total_trades: 0,
            winning_trades: 0,
            config,
        }
    }

    /// Set the instrument's lot size
    pub fn with_lot_size(mut self, lot: LotSize) -> Self {
        self.sizer = PositionSizer::new(lot);
        self
    }

    pub fn with_bookkeeping(mut self, policy: BookkeepingPolicy) -> Self {
        self.bookkeeping = policy;
        self
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    pub fn drawdown(&self) -> &DrawdownProtector {
        &self.drawdown
    }

    pub fn heat(&self) -> &PortfolioHeatMonitor {
        &self.heat
    }

    /// Record the bar's equity without evaluating an entry
    pub fn on_bar(&mut self, account_value: Decimal) -> ProtectionLevel {
        let level = self.drawdown.update(account_value);
        self.publish_gauges();
        level
    }

    /// Pre-trade check using the profile's stop method
    pub fn should_enter_trade(
        &mut self,
        entry_price: Decimal,
        side: Side,
        account_value: Decimal,
        atr_value: Option<Decimal>,
    ) -> TradeDecision {
        let mut candidate = TradeCandidate::new(entry_price, side, account_value);
        candidate.atr_value = atr_value;
        self.evaluate(&candidate)
    }

    /// Pre-trade check for a fully specified candidate
    ///
    /// Never fails: bad inputs become `RejectionReason::InvalidInput`.
    pub fn evaluate(&mut self, candidate: &TradeCandidate) -> TradeDecision {
        let decision = self.decide(candidate);

        match &decision {
            TradeDecision::Approved(trade) => {
                tracing::info!(
                    side = %candidate.side,
                    entry = %candidate.entry_price,
                    size = %trade.size,
                    stop = %trade.stop_price,
                    risk = %trade.risk_amount,
                    level = ?trade.protection_level,
                    "Trade approved"
                );
                telemetry::increment_counter(CounterMetric::TradesApproved, None);
            }
            TradeDecision::Rejected(reason) => {
                tracing::info!(
                    side = %candidate.side,
                    entry = %candidate.entry_price,
                    reason = reason.code(),
                    "Trade rejected: {}",
                    reason
                );
                telemetry::increment_counter(CounterMetric::TradesRejected, Some(reason.code()));
            }
        }
        self.publish_gauges();

        decision
    }

    fn decide(&mut self, candidate: &TradeCandidate) -> TradeDecision {
        let account_value = candidate.account_value;

        // One equity snapshot for the whole decision
        let level = self.drawdown.update(account_value);
        if !level.allows_entries() {
            return TradeDecision::Rejected(RejectionReason::CircuitBreakerActive(
                self.drawdown.current_drawdown(),
            ));
        }

        let method = candidate
            .stop_method
            .unwrap_or(self.config.stop_loss_method());
        let stop_price = match self.stops.get_stop_price(
            candidate.entry_price,
            candidate.side,
            method,
            &self.config,
            candidate.atr_value,
            candidate.technical_level,
        ) {
            Ok(stop) => stop,
            Err(e) => return TradeDecision::Rejected(RejectionReason::InvalidInput(e.to_string())),
        };

        let base_size = match self.sizer.calculate_size(
            account_value,
            candidate.entry_price,
            stop_price,
            &self.config,
        ) {
            Ok(size) => size,
            Err(e) => return TradeDecision::Rejected(RejectionReason::InvalidInput(e.to_string())),
        };

        let vol_factor = match candidate.volatility.map(volatility_factor).transpose() {
            Ok(factor) => factor.unwrap_or(Decimal::ONE),
            Err(e) => return TradeDecision::Rejected(RejectionReason::InvalidInput(e.to_string())),
        };

        let size = self
            .sizer
            .lot()
            .tradable(base_size * level.size_multiplier() * vol_factor);
        if size <= dec!(0) {
            return TradeDecision::Rejected(RejectionReason::SizeTooSmall);
        }

        let Some(risk_amount) = size.checked_mul((candidate.entry_price - stop_price).abs()) else {
            return TradeDecision::Rejected(RejectionReason::InvalidInput(
                RiskError::Overflow("trade risk amount").to_string(),
            ));
        };
        if let Err(reason) = self
            .heat
            .check_admission(risk_amount, account_value, &self.config)
        {
            return TradeDecision::Rejected(reason);
        }

        TradeDecision::Approved(ApprovedTrade {
            size,
            stop_price,
            risk_amount,
            protection_level: level,
        })
    }

    /// Track a filled entry; pass the filled quantity, not the approved one
    pub fn register_position(
        &mut self,
        id: PositionId,
        entry_price: Decimal,
        stop_price: Decimal,
        quantity: Decimal,
        side: Side,
    ) -> Result<(), RiskError> {
        let position = OpenPosition::new(id, entry_price, stop_price, quantity, side)?;
        let risk_amount = position.risk_amount;

        if let Err(e) = self.heat.register(position) {
            tracing::warn!(%id, error = %e, "Position registration rejected");
            return Err(e);
        }

        tracing::debug!(%id, %risk_amount, open = self.heat.open_count(), "Position registered");
        self.publish_gauges();
        Ok(())
    }

    /// Stop tracking a closed position
    ///
    /// Under `BookkeepingPolicy::Lenient` an unknown id is logged and ignored;
    /// under `Strict` it is returned as `RiskError::UnknownPosition`.
    pub fn release_position(&mut self, id: PositionId) -> Result<Option<OpenPosition>, RiskError> {
        match self.heat.release(id) {
            Ok(position) => {
                tracing::debug!(%id, open = self.heat.open_count(), "Position released");
                self.publish_gauges();
                Ok(Some(position))
            }
            Err(e) => {
                tracing::warn!(%id, "Release of unknown position");
                match self.bookkeeping {
                    BookkeepingPolicy::Lenient => Ok(None),
                    BookkeepingPolicy::Strict => Err(e),
                }
            }
        }
    }

    /// Release a position and record the trade outcome
    pub fn close_position(
        &mut self,
        id: PositionId,
        realized_pnl: Decimal,
    ) -> Result<Option<OpenPosition>, RiskError> {
        let released = self.release_position(id)?;
        if released.is_some() {
            self.record_trade_result(realized_pnl);
        }
        Ok(released)
    }

    /// Count a closed trade toward win-rate statistics
    pub fn record_trade_result(&mut self, realized_pnl: Decimal) {
        self.total_trades += 1;
        if realized_pnl > dec!(0) {
            self.winning_trades += 1;
        }
    }

    /// Current risk state, using the last equity snapshot
    pub fn get_risk_metrics(&self) -> RiskMetrics {
        let account_value = self.drawdown.current_equity();
        let current_heat = self.heat.current_heat(account_value);
        let win_rate = if self.total_trades == 0 {
            dec!(0)
        } else {
            Decimal::from(self.winning_trades) / Decimal::from(self.total_trades)
        };

        RiskMetrics {
            account_value,
            peak_equity: self.drawdown.peak_equity(),
            current_drawdown: self.drawdown.current_drawdown(),
            protection_level: self.drawdown.level(),
            current_heat,
            heat_status: self.heat.heat_status(account_value, &self.config),
            risk_utilization: current_heat
                .checked_div(self.config.portfolio_heat_limit())
                .unwrap_or(Decimal::MAX),
            active_positions: self.heat.open_count(),
            max_positions: self.config.max_positions(),
            total_trades: self.total_trades,
            winning_trades: self.winning_trades,
            win_rate,
        }
    }

    /// Emit a one-line status record
    pub fn log_risk_status(&self) {
        let m = self.get_risk_metrics();
        let heat_pct = (m.current_heat * dec!(100)).round_dp(2);
        let drawdown_pct = (m.current_drawdown * dec!(100)).round_dp(2);
        tracing::info!(
            equity = %m.account_value,
            %heat_pct,
            %drawdown_pct,
            positions = m.active_positions,
            max_positions = m.max_positions,
            level = ?m.protection_level,
            "Risk status"
        );
    }

    fn publish_gauges(&self) {
        let account_value = self.drawdown.current_equity();
        telemetry::set_gauge(GaugeMetric::Equity, account_value);
        telemetry::set_gauge(GaugeMetric::DrawdownPct, self.drawdown.current_drawdown());
        telemetry::set_gauge(
            GaugeMetric::PortfolioHeat,
            self.heat.current_heat(account_value),
        );
        telemetry::set_gauge(
            GaugeMetric::OpenPositions,
            Decimal::from(self.heat.open_count()),
        );
        telemetry::set_gauge(
            GaugeMetric::ProtectionLevel,
            Decimal::from(self.drawdown.level().code()),
        );
    }
}
