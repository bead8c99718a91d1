//! Evaluate command implementation

use super::OutputFormat;
use crate::config::EngineConfig;
use crate::profile::StopLossMethod;
use crate::risk::{RiskMetrics, Side, TradeCandidate, TradeDecision};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Candidate entry price
    #[arg(long)]
    pub entry: Decimal,

    /// Trade direction
    #[arg(long, value_enum, default_value_t = Side::Long)]
    pub side: Side,

    /// Current mark-to-market equity
    #[arg(long)]
    pub equity: Decimal,

    /// Session peak equity, recorded before the candidate
    #[arg(long)]
    pub peak: Option<Decimal>,

    /// Average true range for volatility stops
    #[arg(long)]
    pub atr: Option<Decimal>,

    /// Support/resistance level for level-based stops
    #[arg(long)]
    pub level: Option<Decimal>,

    /// Volatility relative to normal (1 = normal)
    #[arg(long)]
    pub volatility: Option<Decimal>,

    /// Override the profile's stop method
    #[arg(long, value_enum)]
    pub stop_method: Option<StopLossMethod>,

    /// Output format: table or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct EvaluateReport {
    decision: TradeDecision,
    metrics: RiskMetrics,
}

impl EvaluateArgs {
    pub fn execute(&self, engine: &EngineConfig) -> anyhow::Result<()> {
        println!("{}", self.render(engine)?);
        Ok(())
    }

    pub fn render(&self, engine: &EngineConfig) -> anyhow::Result<String> {
        let mut manager = engine.build_manager()?;

        if let Some(peak) = self.peak {
            manager.on_bar(peak);
        }

        let mut candidate = TradeCandidate::new(self.entry, self.side, self.equity);
        candidate.atr_value = self.atr;
        candidate.technical_level = self.level;
        candidate.stop_method = self.stop_method;
        candidate.volatility = self.volatility;

        let decision = manager.evaluate(&candidate);
        let report = EvaluateReport {
            decision,
            metrics: manager.get_risk_metrics(),
        };

        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&report)?),
            OutputFormat::Table => Ok(render_table(&report)),
        }
    }
}

fn render_table(report: &EvaluateReport) -> String {
    let hundred = Decimal::ONE_HUNDRED;
    let m = &report.metrics;
    let mut out = String::new();

    match &report.decision {
        TradeDecision::Approved(trade) => {
            out.push_str("Decision:        APPROVED\n");
            out.push_str(&format!("Size:            {}\n", trade.size));
            out.push_str(&format!("Stop Price:      {}\n", trade.stop_price.round_dp(4)));
            out.push_str(&format!("Risk Amount:     {}\n", trade.risk_amount.round_dp(2)));
            out.push_str(&format!("Protection:      {:?}\n", trade.protection_level));
        }
        TradeDecision::Rejected(reason) => {
            out.push_str("Decision:        REJECTED\n");
            out.push_str(&format!("Reason:          {} ({})\n", reason, reason.code()));
        }
    }

    out.push_str(&format!("Equity:          {}\n", m.account_value));
    out.push_str(&format!("Peak Equity:     {}\n", m.peak_equity));
    out.push_str(&format!(
        "Drawdown:        {:.2}%\n",
        m.current_drawdown * hundred
    ));
    out.push_str(&format!("Protection:      {:?}\n", m.protection_level));
    out.push_str(&format!(
        "Positions:       {}/{}\n",
        m.active_positions, m.max_positions
    ));
    out
}
