//! Timeline reconstruction benchmark: a year of daily trading across a small
//! universe, replayed into ~260 snapshots.

use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use phasegate_core::domain::{TradeEvent, TradeSide, TradeStatus};
use phasegate_core::ledger::NormalizedLedger;
use phasegate_core::prices::{PriceBook, PricePoint, PriceSeries};
use phasegate_core::timeline::reconstruct;

const SYMBOLS: &[&str] = &["NVDA", "AMD", "TSM", "MSFT", "GOOG"];

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
}

fn synthetic_trades(days: u64) -> Vec<TradeEvent> {
    let mut trades = Vec::new();
    for offset in 0..days {
        let date = start() + Days::new(offset);
        let symbol = SYMBOLS[(offset as usize) % SYMBOLS.len()];
        let entry_price = 100.0 + (offset % 37) as f64;
        let closed = offset % 3 == 0;
        let entry_at = date.and_hms_opt(10, 0, 0).unwrap();
        if closed {
            let exit_date = date + Days::new(5);
            let exit_price = entry_price + 2.0;
            trades.push(TradeEvent {
                symbol: symbol.into(),
                side: TradeSide::Buy,
                shares: 10,
                entry_price,
                entry_at,
                exit_at: Some(exit_date.and_hms_opt(15, 30, 0).unwrap()),
                exit_price: Some(exit_price),
                profit_loss: Some(20.0),
                status: TradeStatus::Closed,
            });
        } else {
            trades.push(TradeEvent {
                symbol: symbol.into(),
                side: TradeSide::Buy,
                shares: 10,
                entry_price,
                entry_at,
                exit_at: None,
                exit_price: None,
                profit_loss: None,
                status: TradeStatus::Open,
            });
        }
    }
    trades
}

fn synthetic_prices(days: u64) -> PriceBook {
    let mut book = PriceBook::new();
    for symbol in SYMBOLS {
        let points: Vec<PricePoint> = (0..days)
            .map(|offset| PricePoint {
                date: start() + Days::new(offset),
                close: 100.0 + ((offset * 7) % 41) as f64,
            })
            .collect();
        book.insert(*symbol, PriceSeries::new(points));
    }
    book
}

fn bench_reconstruct(c: &mut Criterion) {
    let days = 365;
    let trades = synthetic_trades(days);
    let prices = synthetic_prices(days);
    let as_of = start() + Days::new(days);

    c.bench_function("reconstruct_one_year", |b| {
        b.iter(|| {
            let ledger = NormalizedLedger::from_trades(black_box(&trades), start());
            reconstruct(&ledger, black_box(&prices), 100_000.0, as_of).unwrap()
        })
    });
}

criterion_group!(benches, bench_reconstruct);
criterion_main!(benches);
