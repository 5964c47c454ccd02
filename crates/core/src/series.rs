//! The time-series normalization and aggregation engine.
//!
//! Everything here is a pure, synchronous function over in-memory data:
//! raw observations → daily buckets → dense gap-filled series → weighted
//! portfolio series, plus the chart-axis tick generator and the two-source
//! latest-price reconciler. "Now" is always an explicit parameter so tests
//! stay deterministic; production callers pass `Utc::now()`.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use std::collections::{BTreeMap, HashMap};

use crate::models::price::{PriceObservation, PriceSnapshot};
use crate::models::series::{DayBucket, DenseSeriesPoint, PortfolioPoint};

// ── Day-epoch keys ──────────────────────────────────────────────────

/// The single canonical "start of day" function.
///
/// Every day-epoch key in the library comes through here (or through
/// [`day_epoch_of`]), so producers and consumers can never disagree on
/// where a day starts. Keys are milliseconds of the day's UTC midnight.
pub fn day_epoch_ms(dt: DateTime<Utc>) -> i64 {
    day_epoch_of(dt.date_naive())
}

/// Day-epoch key for a calendar date (ms of its UTC midnight).
pub fn day_epoch_of(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Inverse of [`day_epoch_of`]. Returns None for out-of-range keys.
pub fn date_of_epoch(epoch_ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(epoch_ms).map(|dt| dt.date_naive())
}

// ── Epoch Bucketer ──────────────────────────────────────────────────

/// Chart-axis tick marks for a date range, in ascending epoch ms.
///
/// Granularity follows the total span: under 30 days one tick per calendar
/// day, under 365 days one tick per month boundary, otherwise one per year
/// boundary. The first tick is always exactly `from`; subsequent ticks are
/// the aligned boundaries emitted while strictly before `to`.
///
/// A missing bound yields an empty sequence — "no axis decoration", not an
/// error.
pub fn axis_epochs(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Vec<i64> {
    let (from, to) = match (from, to) {
        (Some(from), Some(to)) => (from, to),
        _ => return Vec::new(),
    };

    let mut epochs = vec![from.timestamp_millis()];
    let span_days = (to - from).num_days();

    let mut cursor = if span_days < 30 {
        from.date_naive() + Duration::days(1)
    } else if span_days < 365 {
        month_start_after(from.date_naive())
    } else {
        year_start_after(from.date_naive())
    };

    // Emit aligned boundaries until the candidate is no longer before `to`.
    while cursor.and_time(NaiveTime::MIN).and_utc() < to {
        epochs.push(day_epoch_of(cursor));
        cursor = if span_days < 30 {
            cursor + Duration::days(1)
        } else if span_days < 365 {
            month_start_after(cursor)
        } else {
            year_start_after(cursor)
        };
    }

    epochs
}

/// First day of the month strictly after `d`'s month.
fn month_start_after(d: NaiveDate) -> NaiveDate {
    let first = d.with_day(1).unwrap_or(d);
    first.checked_add_months(Months::new(1)).unwrap_or(first)
}

/// January 1st of the year strictly after `d`'s year.
fn year_start_after(d: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(d.year() + 1, 1, 1).unwrap_or(d)
}

// ── Daily Aggregator ────────────────────────────────────────────────

/// Fold raw observations into one bucket per calendar day.
///
/// Each bucket keeps a running mean price (`sum_price / sample_count`) and
/// a summed volume. The fold is commutative: input order never changes the
/// final bucket values. Empty input yields an empty map.
pub fn aggregate_daily(observations: &[PriceObservation]) -> BTreeMap<i64, DayBucket> {
    let mut buckets: BTreeMap<i64, DayBucket> = BTreeMap::new();

    for obs in observations {
        let key = day_epoch_ms(obs.date);
        match buckets.get_mut(&key) {
            Some(bucket) => {
                bucket.sample_count += 1;
                bucket.sum_price += obs.price;
                bucket.volume += obs.volume;
                bucket.price = bucket.sum_price / f64::from(bucket.sample_count);
            }
            None => {
                buckets.insert(
                    key,
                    DayBucket {
                        day_epoch: key,
                        sample_count: 1,
                        sum_price: obs.price,
                        price: obs.price,
                        volume: obs.volume,
                    },
                );
            }
        }
    }

    buckets
}

/// Flatten an aggregation result into an ascending per-day series,
/// ready for gap filling.
pub fn bucket_series(buckets: &BTreeMap<i64, DayBucket>) -> Vec<DenseSeriesPoint> {
    buckets
        .values()
        .map(|b| DenseSeriesPoint {
            day_epoch: b.day_epoch,
            price: b.price,
            volume: b.volume,
        })
        .collect()
}

// ── Gap Filler ──────────────────────────────────────────────────────

/// Expand a day-bucketed series into a dense series with exactly one entry
/// per calendar day from `backfill_from` (or the first input day, or `now`)
/// through `now` inclusive.
///
/// Days before the first observation stay at price=0/volume=0 — there is
/// nothing yet to carry. From the first observation onward, days without
/// data hold the last seen price (volume held, or zero if never seen).
/// Values are never filled backward from a future observation.
///
/// Total over all valid inputs: a `backfill_from` later than `now`
/// degenerates to the single day `now`, never an empty series.
pub fn fill_gaps(
    points: &[DenseSeriesPoint],
    backfill_from: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> Vec<DenseSeriesPoint> {
    let end = now.date_naive();
    let start = backfill_from
        .or_else(|| points.first().and_then(|p| date_of_epoch(p.day_epoch)))
        .unwrap_or(end)
        .min(end);

    // Day-epoch lookup into the source; duplicates (which the aggregator
    // never produces) resolve last-write-wins.
    let by_day: HashMap<i64, &DenseSeriesPoint> =
        points.iter().map(|p| (p.day_epoch, p)).collect();

    let total_days = (end - start).num_days() as usize + 1;
    let mut series = Vec::with_capacity(total_days);
    let mut last_price: Option<f64> = None;
    let mut last_volume: Option<f64> = None;

    let mut day = start;
    loop {
        let key = day_epoch_of(day);
        match by_day.get(&key) {
            Some(point) => {
                series.push(DenseSeriesPoint {
                    day_epoch: key,
                    price: point.price,
                    volume: point.volume,
                });
                last_price = Some(point.price);
                last_volume = Some(point.volume);
            }
            None => match last_price {
                Some(price) => series.push(DenseSeriesPoint {
                    day_epoch: key,
                    price,
                    volume: last_volume.unwrap_or(0.0),
                }),
                None => series.push(DenseSeriesPoint {
                    day_epoch: key,
                    price: 0.0,
                    volume: 0.0,
                }),
            },
        }

        if day >= end {
            break;
        }
        day = day + Duration::days(1);
    }

    series
}

// ── Latest-Price Reconciler ─────────────────────────────────────────

/// Pick the fresher of two price readings by timestamp.
///
/// `official` is the head of the slow-updating price history; `cached` is
/// the opportunistic market-API read. Whichever has the strictly later date
/// wins; a tie goes to `cached`. One absent → the other's price; both
/// absent → 0.
pub fn latest_price(official: Option<&PriceSnapshot>, cached: Option<&PriceSnapshot>) -> f64 {
    match (official, cached) {
        (Some(a), Some(b)) => {
            if a.date > b.date {
                a.price
            } else {
                b.price
            }
        }
        (Some(a), None) => a.price,
        (None, Some(b)) => b.price,
        (None, None) => 0.0,
    }
}

// ── Portfolio Aggregator ────────────────────────────────────────────

/// Combine per-item dense series, weighted by held quantity, into a single
/// portfolio-value series: `value(day) = Σ quantity_i × price_i(day)`.
///
/// Output is in canonical ascending day-epoch order. `hits` counts how many
/// item series contributed to each day; it is diagnostic only and never
/// enters the sum. Items whose series lack a day simply contribute nothing
/// to it (their gap-filled series already guarantee full range coverage
/// upstream).
pub fn aggregate_portfolio(items: &[(f64, Vec<DenseSeriesPoint>)]) -> Vec<PortfolioPoint> {
    let mut days: BTreeMap<i64, PortfolioPoint> = BTreeMap::new();

    for (quantity, series) in items {
        for point in series {
            match days.get_mut(&point.day_epoch) {
                Some(day) => {
                    day.value += quantity * point.price;
                    day.hits += 1;
                }
                None => {
                    days.insert(
                        point.day_epoch,
                        PortfolioPoint {
                            day_epoch: point.day_epoch,
                            value: quantity * point.price,
                            hits: 1,
                        },
                    );
                }
            }
        }
    }

    days.into_values().collect()
}
