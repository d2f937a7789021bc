//! Property tests for orchestration and ranking.

use chrono_tz::Asia;
use proptest::prelude::*;
use utscan_core::data::SyntheticProvider;
use utscan_core::domain::{CandlesAgo, SignalType, SymbolResult};
use utscan_runner::{scan, scan_sequential, NoProgress, Report, Scanner};

fn provider(seed: u64, failing: &[String]) -> SyntheticProvider {
    SyntheticProvider::new(seed, Asia::Kolkata)
        .with_len(60)
        .with_failing(failing.iter().cloned())
}

fn arb_candles_ago() -> impl Strategy<Value = CandlesAgo> {
    prop_oneof![
        (0usize..20).prop_map(CandlesAgo::Finite),
        Just(CandlesAgo::Infinite),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Concurrent and sequential scans rank to the same report.
    #[test]
    fn concurrent_equals_sequential(
        seed in any::<u64>(),
        n in 1usize..20,
        workers in 1usize..8,
        fail_mask in any::<u32>(),
    ) {
        let symbols: Vec<String> = (0..n).map(|i| format!("S{i}")).collect();
        let failing: Vec<String> = symbols
            .iter()
            .enumerate()
            .filter(|(i, _)| fail_mask & (1 << i) != 0)
            .map(|(_, s)| s.clone())
            .collect();
        let p = provider(seed, &failing);
        let scanner = Scanner::default();

        let concurrent = Report::from_results(scan(&symbols, &p, &scanner, workers, &NoProgress).unwrap());
        let sequential = Report::from_results(scan_sequential(&symbols, &p, &scanner, &NoProgress));
        prop_assert_eq!(concurrent, sequential);
    }

    /// Ranking is a function of (candles_ago, index) only.
    #[test]
    fn ranking_ignores_arrival_order(
        agos in prop::collection::vec(arb_candles_ago(), 0..30),
        shuffle_seed in any::<u64>(),
    ) {
        let rows: Vec<SymbolResult> = agos
            .iter()
            .enumerate()
            .map(|(i, &ago)| SymbolResult {
                symbol: format!("S{i}"),
                signal_type: if ago.is_finite() { SignalType::Buy } else { SignalType::NoSignal },
                candles_ago: ago,
                message: String::new(),
                index: i,
            })
            .collect();

        let mut shuffled = rows.clone();
        // Deterministic Fisher-Yates from the seed.
        let mut state = shuffle_seed | 1;
        for i in (1..shuffled.len()).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            shuffled.swap(i, (state % (i as u64 + 1)) as usize);
        }

        let a = Report::from_results(rows);
        let b = Report::from_results(shuffled);
        prop_assert_eq!(&a, &b);

        for pair in a.rows().windows(2) {
            prop_assert!((pair[0].candles_ago, pair[0].index) < (pair[1].candles_ago, pair[1].index));
        }
        if let Some(first_inf) = a.rows().iter().position(|r| !r.candles_ago.is_finite()) {
            prop_assert!(a.rows()[first_inf..].iter().all(|r| !r.candles_ago.is_finite()));
        }
    }
}
