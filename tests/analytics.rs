//! Properties of the analytics engine: normalization, aggregation, max pain
//! and the range estimator.

use std::collections::HashMap;

use chrono::NaiveDate;
use oi_scope::analytics::*;
use oi_scope::error::OiError;
use oi_scope::types::option_chain::{ExpDateMap, OptionChainResponse, OptionContract, StrikePrice};

/// Build one side of a chain from `(expiry, strike label, strike, oi)`.
fn side(entries: &[(&str, &str, f64, i64)]) -> ExpDateMap {
    let mut map: ExpDateMap = HashMap::new();
    for &(expiry, label, strike, oi) in entries {
        map.entry(expiry.to_owned())
            .or_default()
            .entry(label.to_owned())
            .or_default()
            .push(OptionContract::new(strike, oi));
    }
    map
}

fn row(strike: f64, calls: u64, puts: u64) -> OpenInterestRow {
    OpenInterestRow { strike, calls, puts }
}

fn candles(ranges: &[f64]) -> Vec<DailyCandle> {
    ranges
        .iter()
        .map(|r| DailyCandle::new(100.0, 100.0 + r, 100.0, 100.0))
        .collect()
}

// ===================================================================
// Normalizer
// ===================================================================

#[test]
fn normalize_sums_across_expirations() {
    let calls = side(&[
        ("2026-10-23:4", "100.0", 100.0, 50),
        ("2026-10-30:11", "100.0", 100.0, 25),
        ("2026-10-30:11", "105.0", 105.0, 5),
    ]);
    let table = normalize_side(&calls).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table[&StrikeKey::from_price(100.0).unwrap()], 75);
    assert_eq!(table[&StrikeKey::from_price(105.0).unwrap()], 5);
}

#[test]
fn normalize_reads_only_first_record_per_strike() {
    let mut calls = side(&[("2026-10-23:4", "100.0", 100.0, 50)]);
    calls
        .get_mut("2026-10-23:4")
        .unwrap()
        .get_mut("100.0")
        .unwrap()
        .push(OptionContract::new(100.0, 9_999));

    let table = normalize_side(&calls).unwrap();
    assert_eq!(table[&StrikeKey::from_price(100.0).unwrap()], 50);
}

#[test]
fn normalize_merges_equal_nominal_strikes() {
    let mut calls = side(&[("2026-10-23:4", "105", 105.0, 10)]);
    calls.get_mut("2026-10-23:4").unwrap().insert(
        "105.0".into(),
        vec![OptionContract {
            strike_price: Some(StrikePrice::Text("105.000".into())),
            open_interest: Some(7),
            ..OptionContract::default()
        }],
    );
    calls
        .entry("2026-10-30:11".into())
        .or_default()
        .insert("105.00".into(), vec![OptionContract::new(105.000_000_000_01, 3)]);

    let table = normalize_side(&calls).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.values().sum::<u64>(), 20);
}

#[test]
fn normalize_rejects_malformed_records() {
    let missing_oi = {
        let mut m = side(&[("e", "100.0", 100.0, 1)]);
        m.get_mut("e").unwrap().get_mut("100.0").unwrap()[0].open_interest = None;
        m
    };
    let missing_strike = {
        let mut m = side(&[("e", "100.0", 100.0, 1)]);
        m.get_mut("e").unwrap().get_mut("100.0").unwrap()[0].strike_price = None;
        m
    };
    let bad_strike = {
        let mut m = side(&[("e", "100.0", 100.0, 1)]);
        m.get_mut("e").unwrap().get_mut("100.0").unwrap()[0].strike_price =
            Some(StrikePrice::Text("one hundred".into()));
        m
    };
    let negative_oi = side(&[("e", "100.0", 100.0, -3)]);
    let negative_strike = side(&[("e", "-5.0", -5.0, 1)]);
    let empty_records = {
        let mut m = side(&[("e", "100.0", 100.0, 1)]);
        m.get_mut("e").unwrap().get_mut("100.0").unwrap().clear();
        m
    };

    for map in [missing_oi, missing_strike, bad_strike, negative_oi, negative_strike, empty_records] {
        let err = normalize_side(&map).unwrap_err();
        assert!(matches!(err, OiError::MalformedChainData(_)), "{err}");
        assert!(!err.is_provider_unavailable());
    }
}

#[test]
fn snapshot_from_wire_accepts_numeric_and_text_strikes() {
    let json = r#"{
        "symbol": "TQQQ",
        "status": "SUCCESS",
        "callExpDateMap": {
            "2026-10-23:4": {
                "100.0": [{"putCall": "CALL", "strikePrice": 100.0, "openInterest": 50}],
                "105.0": [{"putCall": "CALL", "strikePrice": "105.0", "openInterest": 5}]
            }
        },
        "putExpDateMap": {
            "2026-10-23:4": {
                "105.0": [{"putCall": "PUT", "strikePrice": 105, "openInterest": 60}]
            }
        }
    }"#;
    let resp: OptionChainResponse = serde_json::from_str(json).unwrap();
    let chain = normalize(&ChainSnapshot::from(resp)).unwrap();

    assert_eq!(chain.calls.len(), 2);
    assert_eq!(chain.puts[&StrikeKey::from_price(105.0).unwrap()], 60);
}

#[test]
fn snapshot_from_wire_ignores_oddly_typed_pricing_fields() {
    let json = r#"{
        "symbol": "TQQQ",
        "underlyingPrice": "n/a",
        "callExpDateMap": {
            "2026-10-23:4": {
                "100.0": [{
                    "putCall": "CALL",
                    "strikePrice": 100.0,
                    "openInterest": 50,
                    "bid": "NaN",
                    "ask": null,
                    "last": "-",
                    "volatility": "NaN",
                    "delta": "-999.0",
                    "totalVolume": 12.5,
                    "daysToExpiration": "4",
                    "expirationDate": 1792800000000
                }]
            }
        },
        "putExpDateMap": {}
    }"#;
    let resp: OptionChainResponse = serde_json::from_str(json).unwrap();
    let chain = normalize(&ChainSnapshot::from(resp)).unwrap();

    assert_eq!(chain.calls[&StrikeKey::from_price(100.0).unwrap()], 50);
    assert!(chain.puts.is_empty());
}

// ===================================================================
// Aggregator
// ===================================================================

fn sample_chain() -> NormalizedChain {
    let calls = side(&[
        ("e", "90.0", 90.0, 40),
        ("e", "100.0", 100.0, 50),
        ("e", "105.0", 105.0, 5),
    ]);
    let puts = side(&[
        ("e", "100.0", 100.0, 10),
        ("e", "105.0", 105.0, 60),
        ("e", "120.0", 120.0, 500),
    ]);
    normalize(&ChainSnapshot { calls, puts }).unwrap()
}

#[test]
fn rows_cover_union_of_strikes_with_zero_fill() {
    let chain = sample_chain();
    let agg = aggregate(&chain.calls, &chain.puts, StrikeRange::default());

    assert_eq!(
        agg.rows,
        vec![
            row(90.0, 40, 0),
            row(100.0, 50, 10),
            row(105.0, 5, 60),
            row(120.0, 0, 500),
        ]
    );
}

#[test]
fn totals_ignore_range_but_maxima_respect_it() {
    let chain = sample_chain();
    let range = StrikeRange::new(95.0, 110.0).unwrap();
    let agg = aggregate(&chain.calls, &chain.puts, range);

    assert_eq!(agg.stats.total_calls, 95);
    assert_eq!(agg.stats.total_puts, 570);
    assert_eq!(agg.stats.total_calls, agg.rows.iter().map(|r| r.calls).sum::<u64>());
    assert_eq!(agg.stats.total_puts, agg.rows.iter().map(|r| r.puts).sum::<u64>());

    assert_eq!(agg.stats.max_call_oi_in_range, 50);
    assert_eq!(agg.stats.max_put_oi_in_range, 60);
    assert_eq!(agg.stats.max_interest_in_range, 60);
}

#[test]
fn range_bounds_are_inclusive() {
    let chain = sample_chain();
    let agg = aggregate(&chain.calls, &chain.puts, StrikeRange::new(90.0, 120.0).unwrap());
    assert_eq!(agg.stats.max_call_oi_in_range, 50);
    assert_eq!(agg.stats.max_put_oi_in_range, 500);

    let agg = aggregate(&chain.calls, &chain.puts, StrikeRange::new(90.0, 90.0).unwrap());
    assert_eq!(agg.stats.max_call_oi_in_range, 40);
    assert_eq!(agg.stats.max_put_oi_in_range, 0);
}

#[test]
fn put_call_ratio_matches_totals() {
    let chain = sample_chain();
    let agg = aggregate(&chain.calls, &chain.puts, StrikeRange::default());
    assert!((agg.stats.put_call_ratio - 570.0 / 95.0).abs() < 1e-9);
}

#[test]
fn put_call_ratio_is_infinite_without_calls() {
    let puts = normalize_side(&side(&[("e", "100.0", 100.0, 10)])).unwrap();
    let agg = aggregate(&StrikeTable::new(), &puts, StrikeRange::default());
    assert_eq!(agg.stats.put_call_ratio, f64::INFINITY);
    assert_eq!(put_call_ratio(0, 0), f64::INFINITY);
    assert_eq!(put_call_ratio(0, 4), 0.0);
}

#[test]
fn aggregate_is_idempotent() {
    let chain = sample_chain();
    let range = StrikeRange::new(95.0, 110.0).unwrap();
    let first = aggregate(&chain.calls, &chain.puts, range);
    let second = aggregate(&chain.calls, &chain.puts, range);

    assert_eq!(first, second);
    assert_eq!(
        first.stats.put_call_ratio.to_bits(),
        second.stats.put_call_ratio.to_bits()
    );
}

#[test]
fn strike_range_rejects_inverted_bounds() {
    assert!(StrikeRange::new(10.0, 5.0).is_err());
    assert!(StrikeRange::new(f64::NAN, 5.0).is_err());
    let r = StrikeRange::around(100.0, 20.0).unwrap();
    assert_eq!((r.lower, r.upper), (80.0, 120.0));
}

// ===================================================================
// Max pain
// ===================================================================

#[test]
fn max_pain_reference_example() {
    let rows = [row(100.0, 50, 10), row(105.0, 5, 60)];
    assert_eq!(settlement_loss(&rows, 100.0), 300.0);
    assert_eq!(settlement_loss(&rows, 105.0), 250.0);
    assert_eq!(max_pain(&rows).unwrap(), 105.0);
}

#[test]
fn max_pain_ties_go_to_lowest_strike_in_any_order() {
    // loss(100) = 10 * 10 = 100, loss(110) = 10 * 10 = 100
    let ascending = [row(100.0, 10, 0), row(110.0, 0, 10)];
    let descending = [row(110.0, 0, 10), row(100.0, 10, 0)];
    assert_eq!(max_pain(&ascending).unwrap(), 100.0);
    assert_eq!(max_pain(&descending).unwrap(), 100.0);
}

#[test]
fn max_pain_single_strike() {
    assert_eq!(max_pain(&[row(42.5, 3, 7)]).unwrap(), 42.5);
}

#[test]
fn max_pain_unavailable_for_empty_chain() {
    assert!(matches!(max_pain(&[]), Err(OiError::MaxPainUnavailable)));
}

#[test]
fn analyze_reports_missing_max_pain_as_none() {
    let analysis = analyze(&ChainSnapshot::default(), StrikeRange::default(), 100.0, 2.0).unwrap();
    assert!(analysis.rows.is_empty());
    assert_eq!(analysis.max_pain, None);
    assert_eq!(analysis.stats.put_call_ratio, f64::INFINITY);
    assert_eq!(analysis.bands, AdrBands { lower: 98.0, upper: 102.0 });
}

#[test]
fn analyze_runs_full_pipeline() {
    let snapshot = ChainSnapshot {
        calls: side(&[("e", "100.0", 100.0, 50), ("e", "105.0", 105.0, 5)]),
        puts: side(&[("e", "100.0", 100.0, 10), ("e", "105.0", 105.0, 60)]),
    };
    let analysis = analyze(&snapshot, StrikeRange::default(), 102.0, 4.0).unwrap();
    assert_eq!(analysis.rows, vec![row(100.0, 50, 10), row(105.0, 5, 60)]);
    assert_eq!(analysis.max_pain, Some(105.0));
    assert_eq!(analysis.bands, AdrBands { lower: 98.0, upper: 106.0 });
}

// ===================================================================
// Range estimator
// ===================================================================

#[test]
fn adr_of_reference_ranges() {
    let adr = average_daily_range(&candles(&[3.0, 4.0, 5.0, 2.0, 6.0]), 5).unwrap();
    assert_eq!(adr, 4.0);
}

#[test]
fn adr_uses_most_recent_candles_and_rounds() {
    // Oldest two are outside the window.
    let adr = average_daily_range(&candles(&[50.0, 50.0, 1.0, 1.0, 1.01]), 3).unwrap();
    assert_eq!(adr, 1.0);

    let adr = average_daily_range(&candles(&[1.0, 2.0, 2.0]), 3).unwrap();
    assert_eq!(adr, 1.67);
}

#[test]
fn adr_fails_on_short_history() {
    let err = average_daily_range(&candles(&[3.0, 4.0, 5.0]), 5).unwrap_err();
    assert!(matches!(
        err,
        OiError::InsufficientHistory { required: 5, available: 3 }
    ));
}

#[test]
fn adr_rejects_zero_window() {
    assert!(matches!(
        average_daily_range(&candles(&[1.0]), 0),
        Err(OiError::InvalidArgument(_))
    ));
}

#[test]
fn history_window_doubles_days_and_ends_yesterday() {
    let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let (start, end) = history_window(today, 5).unwrap();
    assert_eq!(start, NaiveDate::from_ymd_opt(2026, 10, 9).unwrap());
    assert_eq!(end, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
}

#[test]
fn history_window_rejects_windows_outside_the_calendar() {
    let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    assert!(matches!(
        history_window(today, 200_000_000),
        Err(OiError::InvalidArgument(_))
    ));
    assert!(matches!(
        history_window(NaiveDate::MIN, 1),
        Err(OiError::InvalidArgument(_))
    ));
}
