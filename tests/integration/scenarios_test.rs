//! Reference scenarios and engine-wide properties

use riskguard::profile::{
    get_config, RiskAppetite, RiskConfig, RiskConfigBuilder, StopLossMethod, StrategyArchetype,
};
use riskguard::risk::{
    BookkeepingPolicy, PositionSizer, ProtectionLevel, RejectionReason, RiskManager, Side,
    StopLossCalculator, TradeCandidate, TradeDecision,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Moderate trend-following with a 4% percentage stop
fn percentage_config(max_position_pct: Decimal) -> RiskConfig {
    RiskConfig::builder(StrategyArchetype::TrendFollowing, RiskAppetite::Moderate)
        .unwrap()
        .stop_loss_method(StopLossMethod::Percentage)
        .stop_loss_pct(dec!(0.04))
        .max_position_pct(max_position_pct)
        .build()
        .unwrap()
}

fn manager(config: RiskConfig) -> RiskManager {
    RiskManager::with_config(config).with_bookkeeping(BookkeepingPolicy::Strict)
}

#[test]
fn test_scenario_risk_budget_size() {
    let mut manager = manager(percentage_config(dec!(1)));

    let decision = manager.should_enter_trade(dec!(100), Side::Long, dec!(10000), None);
    let trade = decision.approved().unwrap();
    assert_eq!(trade.stop_price, dec!(96));
    assert_eq!(trade.size, dec!(50));
    assert_eq!(trade.risk_amount, dec!(200));
}

#[test]
fn test_scenario_position_cap() {
    let mut manager = manager(percentage_config(dec!(0.10)));

    let decision = manager.should_enter_trade(dec!(100), Side::Long, dec!(10000), None);
    assert_eq!(decision.size(), dec!(10));
}

#[test]
fn test_scenario_zero_risk_per_unit() {
    let config = percentage_config(dec!(1));
    let size = PositionSizer::default()
        .calculate_size(dec!(10000), dec!(100), dec!(100), &config)
        .unwrap();
    assert_eq!(size, dec!(0));

    // Cap of 0.1 units rounds down to nothing
    let mut manager = manager(percentage_config(dec!(0.001)));
    let decision = manager.should_enter_trade(dec!(100), Side::Long, dec!(10000), None);
    assert_eq!(
        decision.rejection_reason(),
        Some(&RejectionReason::SizeTooSmall)
    );
}

#[test]
fn test_scenario_drawdown_levels() {
    let mut manager = manager(percentage_config(dec!(1)));
    assert_eq!(manager.on_bar(dec!(10000)), ProtectionLevel::Normal);

    let d1 = manager.should_enter_trade(dec!(100), Side::Long, dec!(9300), None);
    assert_eq!(d1.approved().unwrap().protection_level, ProtectionLevel::Warning);
    assert_eq!(d1.size(), dec!(46));

    // 9000 * 0.02 / 4 = 45, halved
    let d2 = manager.should_enter_trade(dec!(100), Side::Long, dec!(9000), None);
    assert_eq!(
        d2.approved().unwrap().protection_level,
        ProtectionLevel::RiskReduction
    );
    assert_eq!(d2.size(), dec!(22));

    let d3 = manager.should_enter_trade(dec!(100), Side::Long, dec!(8200), None);
    assert!(matches!(
        d3,
        TradeDecision::Rejected(RejectionReason::CircuitBreakerActive(_))
    ));
    assert_eq!(manager.drawdown().level(), ProtectionLevel::StopTrading);
}

#[test]
fn test_scenario_heat_limit() {
    let config = RiskConfigBuilder::from_config(percentage_config(dec!(1)))
        .risk_per_trade(dec!(0.05))
        .portfolio_heat_limit(dec!(0.08))
        .stop_loss_pct(dec!(0.05))
        .build()
        .unwrap();
    let mut manager = manager(config);

    let first = manager.should_enter_trade(dec!(100), Side::Long, dec!(10000), None);
    let trade = first.approved().unwrap().clone();
    assert_eq!(trade.risk_amount, dec!(500));
    manager
        .register_position(Uuid::new_v4(), dec!(100), trade.stop_price, trade.size, Side::Long)
        .unwrap();

    let second = manager.should_enter_trade(dec!(100), Side::Long, dec!(10000), None);
    match second.rejection_reason() {
        Some(RejectionReason::HeatLimitExceeded {
            projected_heat,
            limit,
        }) => {
            assert_eq!(*projected_heat, dec!(0.1));
            assert_eq!(*limit, dec!(0.08));
        }
        other => panic!("expected heat rejection, got {other:?}"),
    }
}

#[test]
fn test_scenario_atr_fallback_matches_percentage() {
    let config = get_config(StrategyArchetype::TrendFollowing, RiskAppetite::Moderate).unwrap();
    let calc = StopLossCalculator::new();

    for side in [Side::Long, Side::Short] {
        let atr = calc
            .get_stop_price(dec!(250), side, StopLossMethod::Atr, &config, None, None)
            .unwrap();
        let pct = calc
            .get_stop_price(dec!(250), side, StopLossMethod::Percentage, &config, None, None)
            .unwrap();
        assert_eq!(atr, pct);
    }
}

#[test]
fn test_budget_and_cap_hold_across_inputs() {
    let account = dec!(25000);
    for appetite in RiskAppetite::ALL {
        for archetype in StrategyArchetype::ALL {
            let config = get_config(archetype, appetite).unwrap();
            for entry in [dec!(3.5), dec!(42), dec!(180.25), dec!(1999)] {
                let mut manager = RiskManager::with_config(config.clone());
                let candidate = TradeCandidate::new(entry, Side::Long, account)
                    .with_atr(entry * dec!(0.02))
                    .with_technical_level(entry * dec!(0.95));
                let decision = manager.evaluate(&candidate);
                if let Some(trade) = decision.approved() {
                    let per_unit = (entry - trade.stop_price).abs();
                    assert!(trade.size * per_unit <= account * config.risk_per_trade() + per_unit);
                    assert!(trade.size * entry <= account * config.max_position_pct());
                }
            }
        }
    }
}

#[test]
fn test_heat_bounded_at_every_admission() {
    let config = RiskConfigBuilder::from_config(percentage_config(dec!(1)))
        .max_positions(10)
        .build()
        .unwrap();
    let limit = config.portfolio_heat_limit();
    let mut manager = manager(config);
    let account = dec!(10000);

    let mut admitted = 0;
    for _ in 0..10 {
        let decision = manager.should_enter_trade(dec!(100), Side::Long, account, None);
        let Some(trade) = decision.approved().cloned() else {
            break;
        };
        manager
            .register_position(Uuid::new_v4(), dec!(100), trade.stop_price, trade.size, Side::Long)
            .unwrap();
        admitted += 1;
        assert!(manager.heat().current_heat(account) <= limit);
    }

    // 2% per trade against a 10% limit
    assert_eq!(admitted, 5);
}

#[test]
fn test_rising_equity_stays_normal() {
    let mut manager = manager(percentage_config(dec!(1)));
    let mut equity = dec!(1000);
    for _ in 0..50 {
        equity += dec!(17.5);
        assert_eq!(manager.on_bar(equity), ProtectionLevel::Normal);
        assert_eq!(manager.drawdown().peak_equity(), equity);
    }
}

#[test]
fn test_circuit_breaker_holds_until_recovery() {
    let mut manager = manager(percentage_config(dec!(1)));
    manager.on_bar(dec!(10000));

    // Breaker stays on at or below peak * (1 - 0.15) = 8500
    for equity in [dec!(8400), dec!(8000), dec!(8450), dec!(8500)] {
        let decision = manager.should_enter_trade(dec!(100), Side::Long, equity, None);
        assert!(matches!(
            decision.rejection_reason(),
            Some(RejectionReason::CircuitBreakerActive(_))
        ));
    }

    let decision = manager.should_enter_trade(dec!(100), Side::Long, dec!(8600), None);
    assert!(decision.is_approved());
    assert_eq!(
        decision.approved().unwrap().protection_level,
        ProtectionLevel::RiskReduction
    );
}

#[test]
fn test_register_release_round_trip() {
    let mut manager = manager(percentage_config(dec!(1)));
    let account = dec!(10000);
    let keep = Uuid::new_v4();
    manager
        .register_position(keep, dec!(50), dec!(48), dec!(30), Side::Long)
        .unwrap();
    let before = manager.heat().current_heat(account);

    let id = Uuid::new_v4();
    manager
        .register_position(id, dec!(100), dec!(104), dec!(12), Side::Short)
        .unwrap();
    assert!(manager.heat().current_heat(account) > before);

    manager.release_position(id).unwrap();
    assert_eq!(manager.heat().current_heat(account), before);
}
