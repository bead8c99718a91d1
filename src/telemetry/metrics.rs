//! Risk metrics via the `metrics` facade
//!
//! No recorder is installed here; embedding applications choose an exporter.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Latest mark-to-market equity
    Equity,
    /// Current drawdown from peak
    DrawdownPct,
    /// Aggregate capital at risk as a fraction of equity
    PortfolioHeat,
    /// Open position count
    OpenPositions,
    /// Protection level code (0 = normal .. 3 = halted)
    ProtectionLevel,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    TradesApproved,
    TradesRejected,
}

impl GaugeMetric {
    pub fn name(&self) -> &'static str {
        match self {
            GaugeMetric::Equity => "riskguard_equity",
            GaugeMetric::DrawdownPct => "riskguard_drawdown_pct",
            GaugeMetric::PortfolioHeat => "riskguard_portfolio_heat",
            GaugeMetric::OpenPositions => "riskguard_open_positions",
            GaugeMetric::ProtectionLevel => "riskguard_protection_level",
        }
    }
}

impl CounterMetric {
    pub fn name(&self) -> &'static str {
        match self {
            CounterMetric::TradesApproved => "riskguard_trades_approved_total",
            CounterMetric::TradesRejected => "riskguard_trades_rejected_total",
        }
    }
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: Decimal) {
    let value = value.to_f64().unwrap_or_default();
    ::metrics::gauge!(metric.name()).set(value);
}

/// Increment a counter, optionally labelled with a reason code
pub fn increment_counter(metric: CounterMetric, reason: Option<&'static str>) {
    match reason {
        Some(reason) => ::metrics::counter!(metric.name(), "reason" => reason).increment(1),
        None => ::metrics::counter!(metric.name()).increment(1),
    }
}
