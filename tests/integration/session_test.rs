//! Session lifecycle tests driven from configuration

use riskguard::config::Config;
use riskguard::profile::{RiskAppetite, StopLossMethod, StrategyArchetype};
use riskguard::risk::{
    BookkeepingPolicy, ErrorKind, HeatStatus, ProtectionLevel, RejectionReason, RiskError,
    RiskManager, Side, TradeCandidate,
};
use rust_decimal_macros::dec;
use std::io::Write;
use uuid::Uuid;

fn load(toml: &str) -> Config {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{toml}").unwrap();
    Config::load(file.path()).unwrap()
}

#[test]
fn test_session_lifecycle_from_file() {
    let config = load(
        r#"
        [engine]
        archetype = "mean_reversion"
        appetite = "moderate"
        bookkeeping = "lenient"

        [engine.overrides]
        max_position_pct = 1.0
        "#,
    );
    let mut manager = config.engine.build_manager().unwrap();
    let account = dec!(20000);

    // 3% stop: 300 budget / 1.5 per unit
    let decision = manager.should_enter_trade(dec!(50), Side::Long, account, None);
    let trade = decision.approved().unwrap().clone();
    assert_eq!(trade.stop_price, dec!(48.5));
    assert_eq!(trade.size, dec!(200));

    // Partial fill registers the filled quantity
    let winner = Uuid::new_v4();
    manager
        .register_position(winner, dec!(50), trade.stop_price, dec!(120), Side::Long)
        .unwrap();
    assert_eq!(manager.heat().get(&winner).unwrap().risk_amount, dec!(180));

    let loser = Uuid::new_v4();
    manager
        .register_position(loser, dec!(80), dec!(82.4), dec!(50), Side::Short)
        .unwrap();

    let metrics = manager.get_risk_metrics();
    assert_eq!(metrics.active_positions, 2);
    assert_eq!(metrics.current_heat, dec!(0.015));
    assert_eq!(metrics.heat_status, HeatStatus::Normal);
    assert_eq!(metrics.risk_utilization, dec!(0.15));

    manager.close_position(winner, dec!(240)).unwrap();
    manager.close_position(loser, dec!(-120)).unwrap();

    // Lenient: a second close is logged and ignored
    assert_eq!(manager.close_position(loser, dec!(-120)).unwrap(), None);

    let metrics = manager.get_risk_metrics();
    assert_eq!(metrics.active_positions, 0);
    assert_eq!(metrics.current_heat, dec!(0));
    assert_eq!(metrics.total_trades, 2);
    assert_eq!(metrics.winning_trades, 1);
    assert_eq!(metrics.win_rate, dec!(0.5));
    manager.log_risk_status();
}

#[test]
fn test_strict_bookkeeping_surfaces_mismatches() {
    let mut manager = RiskManager::new(StrategyArchetype::Momentum, RiskAppetite::Aggressive)
        .unwrap()
        .with_bookkeeping(BookkeepingPolicy::Strict);

    let id = Uuid::new_v4();
    manager
        .register_position(id, dec!(10), dec!(9.4), dec!(100), Side::Long)
        .unwrap();

    let dup = manager
        .register_position(id, dec!(10), dec!(9.4), dec!(100), Side::Long)
        .unwrap_err();
    assert_eq!(dup, RiskError::DuplicatePosition(id));
    assert_eq!(dup.kind(), ErrorKind::StateConsistency);

    assert!(manager.release_position(id).unwrap().is_some());
    let err = manager.release_position(id).unwrap_err();
    assert_eq!(err, RiskError::UnknownPosition(id));
}

#[test]
fn test_position_count_gate() {
    let config = load(
        r#"
        [engine]
        archetype = "buy_hold"
        appetite = "moderate"
        "#,
    );
    let mut manager = config.engine.build_manager().unwrap();
    let account = dec!(100000);

    let first = manager.should_enter_trade(dec!(400), Side::Long, account, None);
    let trade = first.approved().unwrap().clone();
    manager
        .register_position(Uuid::new_v4(), dec!(400), trade.stop_price, trade.size, Side::Long)
        .unwrap();

    let second = manager.should_enter_trade(dec!(400), Side::Long, account, None);
    assert_eq!(
        second.rejection_reason(),
        Some(&RejectionReason::PositionCountExceeded { open: 1, max: 1 })
    );
}

#[test]
fn test_bad_inputs_become_rejections() {
    let mut manager =
        RiskManager::new(StrategyArchetype::TrendFollowing, RiskAppetite::Moderate).unwrap();

    let decision = manager.should_enter_trade(dec!(0), Side::Long, dec!(10000), None);
    assert!(matches!(
        decision.rejection_reason(),
        Some(RejectionReason::InvalidInput(_))
    ));

    let candidate = TradeCandidate::new(dec!(100), Side::Long, dec!(10000))
        .with_stop_method(StopLossMethod::SupportResistance);
    let decision = manager.evaluate(&candidate);
    assert!(matches!(
        decision.rejection_reason(),
        Some(RejectionReason::InvalidInput(_))
    ));

    // The bar loop carries on
    let decision = manager.should_enter_trade(dec!(100), Side::Long, dec!(10000), Some(dec!(2)));
    assert!(decision.is_approved());
    assert_eq!(manager.drawdown().level(), ProtectionLevel::Normal);
}

#[test]
fn test_extreme_inputs_never_stop_the_loop() {
    let mut manager =
        RiskManager::new(StrategyArchetype::TrendFollowing, RiskAppetite::Aggressive).unwrap();
    let account = dec!(1000000);

    let candidates = [
        TradeCandidate::new(dec!(1), Side::Long, account).with_atr(dec!(0.00000000000000000000000001)),
        TradeCandidate::new(dec!(1), Side::Short, account).with_atr(rust_decimal::Decimal::MAX),
        TradeCandidate::new(dec!(100), Side::Long, account).with_volatility(dec!(-2)),
    ];
    for candidate in &candidates {
        let decision = manager.evaluate(candidate);
        assert!(matches!(
            decision.rejection_reason(),
            Some(RejectionReason::InvalidInput(_))
        ));
    }

    // 2.5% budget, 2 * 2.5 ATR stop, 20% cap, 0.8 volatility factor
    let candidate = TradeCandidate::new(dec!(100), Side::Long, account)
        .with_atr(dec!(2))
        .with_volatility(dec!(1.2));
    assert_eq!(manager.evaluate(&candidate).size(), dec!(1600));
}

#[test]
fn test_support_resistance_short() {
    let mut manager =
        RiskManager::new(StrategyArchetype::MeanReversion, RiskAppetite::Aggressive).unwrap();

    let candidate = TradeCandidate::new(dec!(100), Side::Short, dec!(10000))
        .with_stop_method(StopLossMethod::SupportResistance)
        .with_technical_level(dec!(105));
    let decision = manager.evaluate(&candidate);
    let trade = decision.approved().unwrap();
    assert_eq!(trade.stop_price, dec!(105));
    // min(200 / 5, 2000 / 100)
    assert_eq!(trade.size, dec!(20));
}

#[test]
fn test_unknown_pair_in_config_is_rejected() {
    let result = toml::from_str::<Config>(
        r#"
        [engine]
        archetype = "trend_following"
        appetite = "reckless"
        "#,
    );
    assert!(result.is_err());
}
