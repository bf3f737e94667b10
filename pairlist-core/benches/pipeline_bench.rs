//! Criterion benchmarks for pipeline hot paths.
//!
//! Benchmarks:
//! 1. Full stage chain over a large synthetic universe
//! 2. Top-N ranking alone at several universe sizes
//! 3. Manager refresh end to end (providers + chain + publish)

use std::sync::Arc;

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

use pairlist_core::components::{apply_chain, create_from_config, PairFilter};
use pairlist_core::components::filter::VolumePairList;
use pairlist_core::domain::{Instrument, SortKey, Symbol, Ticker, TickerMap};
use pairlist_core::{PairListManager, ProviderError};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_symbols(n: usize) -> Vec<Symbol> {
    (0..n).map(|i| format!("C{i:05}/USDT")).collect()
}

fn make_tickers(symbols: &[Symbol]) -> TickerMap {
    symbols
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let price = 1.0 + (i as f64 * 0.37).sin().abs() * 100.0;
            let quote_volume = 1_000.0 + ((i * 7919) % 100_000) as f64 * 1_000.0;
            let ticker = Ticker {
                symbol: s.clone(),
                last_price: price,
                bid: price * 0.999,
                ask: price * 1.001,
                high_24h: price * 1.06,
                low_24h: price * 0.95,
                volume_24h: quote_volume / price,
                quote_volume_24h: quote_volume,
                price_change_percent_24h: (i as f64 * 0.11).cos() * 8.0,
                timestamp: Utc::now(),
            };
            (s.clone(), ticker)
        })
        .collect()
}

fn make_chain() -> Vec<Box<dyn PairFilter>> {
    [
        json!({ "method": "VolumePairList", "number_assets": 200, "min_value": 10000.0 }),
        json!({ "method": "SpreadFilter", "max_spread_ratio": 0.005 }),
        json!({ "method": "PriceFilter", "min_price": 2.0 }),
        json!({ "method": "VolatilityFilter", "min_volatility": 0.01, "max_volatility": 0.5 }),
        json!({ "method": "BlacklistFilter", "blacklist": ["C00001/USDT", "C00002/USDT"] }),
        json!({ "method": "ShuffleFilter", "seed": 42 }),
        json!({ "method": "OffsetFilter", "offset": 10, "number_assets": 50 }),
    ]
    .iter()
    .filter_map(|cfg| create_from_config(cfg).ok())
    .collect()
}

// ── 1. Full chain ────────────────────────────────────────────────────

fn bench_full_chain(c: &mut Criterion) {
    let symbols = make_symbols(5_000);
    let tickers = make_tickers(&symbols);
    let chain = make_chain();

    c.bench_function("full_chain_5000", |b| {
        b.iter(|| {
            let (out, _) = apply_chain(&chain, black_box(symbols.clone()), &tickers).unwrap();
            black_box(out)
        })
    });
}

// ── 2. Top-N ranking ─────────────────────────────────────────────────

fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("volume_pairlist");
    for n in [500usize, 5_000, 50_000] {
        let symbols = make_symbols(n);
        let tickers = make_tickers(&symbols);
        let stage = VolumePairList::new(100, SortKey::QuoteVolume, 0.0);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(stage.filter(black_box(&symbols), &tickers).unwrap()))
        });
    }
    group.finish();
}

// ── 3. Manager refresh ───────────────────────────────────────────────

fn bench_manager_refresh(c: &mut Criterion) {
    let symbols = make_symbols(5_000);
    let tickers = make_tickers(&symbols);
    let instruments: Vec<Instrument> = symbols
        .iter()
        .map(|s| Instrument::spot(s.as_str(), Utc::now()))
        .collect();

    let m = PairListManager::new();
    m.set_market_provider(Arc::new(move || -> Result<Vec<Instrument>, ProviderError> {
        Ok(instruments.clone())
    }));
    m.set_ticker_provider(Arc::new(move || -> Result<TickerMap, ProviderError> {
        Ok(tickers.clone())
    }));
    for stage in make_chain() {
        m.add_filter(stage);
    }

    c.bench_function("manager_refresh_5000", |b| {
        b.iter(|| black_box(m.refresh().unwrap()))
    });
}

criterion_group!(benches, bench_full_chain, bench_ranking, bench_manager_refresh);
criterion_main!(benches);
