//! Property tests for bucketing, SMA and backtest invariants.
//!
//! Uses proptest to verify:
//! 1. Candle OHLC ordering and bucket alignment
//! 2. Every sample lands in exactly one candle
//! 3. SMA equals the naive window mean and is absent during warmup
//! 4. Flat periods never change equity
//! 5. Repeated calls give identical output

use proptest::prelude::*;
use smacross::domain::backtest::{BacktestConfig, run_backtest};
use smacross::domain::candle::aggregate;
use smacross::domain::daily::to_daily_close;
use smacross::domain::indicator::{SmaSeries, calculate_sma};
use smacross::domain::position::PositionState;
use smacross::domain::sample::Sample;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..100_000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_samples() -> impl Strategy<Value = Vec<Sample>> {
    prop::collection::vec((0i64..10_000_000_000, arb_price()), 0..200).prop_map(|mut v| {
        v.sort_by_key(|(t, _)| *t);
        v.into_iter().map(Sample::from).collect()
    })
}

fn arb_width() -> impl Strategy<Value = i64> {
    prop::sample::select(vec![60_000i64, 300_000, 900_000, 3_600_000, 14_400_000, 86_400_000])
}

fn arb_series() -> impl Strategy<Value = (Vec<f64>, Vec<Option<f64>>)> {
    (2usize..120).prop_flat_map(|n| {
        (
            prop::collection::vec(arb_price(), n),
            prop::collection::vec(prop::option::of(arb_price()), n),
        )
    })
}

// ── 1–2. Bucketing ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn candles_are_well_formed(samples in arb_samples(), width in arb_width()) {
        let candles = aggregate(&samples, width).unwrap();
        for c in &candles {
            prop_assert!(c.low <= c.open && c.open <= c.high);
            prop_assert!(c.low <= c.close && c.close <= c.high);
            prop_assert_eq!(c.bucket_start_ms % width, 0);
        }
        for pair in candles.windows(2) {
            prop_assert!(pair[0].bucket_start_ms < pair[1].bucket_start_ms);
        }
    }

    #[test]
    fn every_sample_in_exactly_one_candle(samples in arb_samples(), width in arb_width()) {
        let candles = aggregate(&samples, width).unwrap();
        for s in &samples {
            let hits = candles.iter().filter(|c| c.contains(s.timestamp_ms, width)).count();
            prop_assert_eq!(hits, 1);
        }
    }

    #[test]
    fn daily_points_are_midnights(samples in arb_samples()) {
        let daily = to_daily_close(&samples).unwrap();
        for d in &daily {
            prop_assert_eq!(d.day_start_ms % 86_400_000, 0);
        }
        for pair in daily.windows(2) {
            prop_assert!(pair[0].day_start_ms < pair[1].day_start_ms);
        }
    }
}

// ── 3. SMA ───────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn sma_matches_naive_mean(
        values in prop::collection::vec(arb_price(), 0..150),
        window in 1usize..30,
    ) {
        let sma = calculate_sma(&values, window).unwrap();
        prop_assert_eq!(sma.len(), values.len());
        for (i, v) in sma.values.iter().enumerate() {
            if i + 1 < window {
                prop_assert!(v.is_none());
            } else {
                let naive = values[i + 1 - window..=i].iter().sum::<f64>() / window as f64;
                let got = v.unwrap();
                prop_assert!((got - naive).abs() <= 1e-9 * naive.abs().max(1.0));
            }
        }
    }
}

// ── 4–5. Backtest ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn flat_steps_keep_equity((closes, sma) in arb_series(), capital in 1.0..10_000.0_f64) {
        let sma = SmaSeries::from_values(1, sma);
        let result = run_backtest(&closes, &sma, &BacktestConfig::new(capital)).unwrap();
        prop_assert_eq!(result.equity_curve.len(), closes.len());
        prop_assert_eq!(result.equity_curve[0], capital);
        for i in 1..closes.len() {
            if result.states[i] == PositionState::Flat {
                prop_assert_eq!(result.equity_curve[i], result.equity_curve[i - 1]);
            }
        }
    }

    #[test]
    fn computations_are_repeatable(
        samples in arb_samples(),
        width in arb_width(),
        window in 1usize..10,
    ) {
        prop_assert_eq!(aggregate(&samples, width).unwrap(), aggregate(&samples, width).unwrap());
        prop_assert_eq!(to_daily_close(&samples).unwrap(), to_daily_close(&samples).unwrap());

        let closes: Vec<f64> = samples.iter().map(|s| s.price).collect();
        let a = calculate_sma(&closes, window).unwrap();
        let b = calculate_sma(&closes, window).unwrap();
        prop_assert_eq!(&a, &b);

        let config = BacktestConfig::new(404.0);
        let ea = run_backtest(&closes, &a, &config).unwrap().equity_curve;
        let eb = run_backtest(&closes, &b, &config).unwrap().equity_curve;
        prop_assert_eq!(ea, eb);
    }
}
