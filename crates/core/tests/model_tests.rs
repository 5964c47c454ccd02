// ═══════════════════════════════════════════════════════════════════
// Model Tests — Item/Holding identity, PriceCache, ChartRange, serde
// ═══════════════════════════════════════════════════════════════════

use chrono::{Duration, NaiveDate, NaiveTime};
use std::collections::HashSet;

use skinfolio_core::models::item::{Holding, Item};
use skinfolio_core::models::price::{PriceCache, PricePoint, PriceSnapshot};
use skinfolio_core::models::range::ChartRange;
use skinfolio_core::models::series::{DayBucket, DenseSeriesPoint};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn point(date: NaiveDate, price: f64, volume: f64) -> PricePoint {
    PricePoint { date, price, volume }
}

// ═══════════════════════════════════════════════════════════════════
//  Item
// ═══════════════════════════════════════════════════════════════════

mod item {
    use super::*;

    #[test]
    fn identity_is_the_market_hash_name() {
        let a = Item::new("AK-47 | Redline (Field-Tested)");
        let b = Item::named("AK-47 | Redline (Field-Tested)", "My Redline");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn different_hash_names_differ() {
        assert_ne!(
            Item::new("AK-47 | Redline (Field-Tested)"),
            Item::new("AK-47 | Redline (Minimal Wear)")
        );
    }

    #[test]
    fn display_uses_the_display_name() {
        let item = Item::named("AWP | Asiimov (Field-Tested)", "Asiimov");
        assert_eq!(item.to_string(), "Asiimov");
    }

    #[test]
    fn plain_constructor_mirrors_hash_name() {
        let item = Item::new("Glock-18 | Fade (Factory New)");
        assert_eq!(item.name, item.market_hash_name);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Holding
// ═══════════════════════════════════════════════════════════════════

mod holding {
    use super::*;

    #[test]
    fn new_has_no_purchase_info() {
        let h = Holding::new(Item::new("AK-47 | Redline (Field-Tested)"), 3);
        assert_eq!(h.quantity, 3);
        assert!(h.buy_price.is_none());
        assert!(h.acquired.is_none());
    }

    #[test]
    fn with_purchase_records_cost_basis() {
        let h = Holding::with_purchase(
            Item::new("AK-47 | Redline (Field-Tested)"),
            2,
            8.5,
            d(2024, 12, 1),
        );
        assert_eq!(h.buy_price, Some(8.5));
        assert_eq!(h.acquired, Some(d(2024, 12, 1)));
    }

    #[test]
    fn ids_are_unique() {
        let item = Item::new("AK-47 | Redline (Field-Tested)");
        let a = Holding::new(item.clone(), 1);
        let b = Holding::new(item, 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn serde_roundtrip_json() {
        let h = Holding::with_purchase(
            Item::new("AWP | Asiimov (Field-Tested)"),
            2,
            60.0,
            d(2024, 6, 15),
        );
        let json = serde_json::to_string(&h).unwrap();
        let back: Holding = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let json = format!(
            r#"{{"id":"{}","item":{{"market_hash_name":"X","name":"X"}},"quantity":1}}"#,
            uuid::Uuid::new_v4()
        );
        let h: Holding = serde_json::from_str(&json).unwrap();
        assert!(h.buy_price.is_none());
        assert!(h.acquired.is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  PriceCache
// ═══════════════════════════════════════════════════════════════════

mod price_cache {
    use super::*;

    const ITEM: &str = "AK-47 | Redline (Field-Tested)";

    #[test]
    fn set_and_get_price() {
        let mut cache = PriceCache::new();
        cache.set_price(ITEM, point(d(2025, 1, 5), 10.0, 3.0));
        assert_eq!(cache.get_price(ITEM, d(2025, 1, 5)), Some(10.0));
        assert_eq!(cache.get_price(ITEM, d(2025, 1, 6)), None);
        assert_eq!(cache.get_price("other", d(2025, 1, 5)), None);
    }

    #[test]
    fn set_price_updates_existing_date() {
        let mut cache = PriceCache::new();
        cache.set_price(ITEM, point(d(2025, 1, 5), 10.0, 3.0));
        cache.set_price(ITEM, point(d(2025, 1, 5), 11.0, 4.0));
        assert_eq!(cache.get_price(ITEM, d(2025, 1, 5)), Some(11.0));
        assert_eq!(cache.total_entries(), 1);
    }

    #[test]
    fn history_stays_sorted_regardless_of_insert_order() {
        let mut cache = PriceCache::new();
        cache.set_price(ITEM, point(d(2025, 1, 7), 3.0, 1.0));
        cache.set_price(ITEM, point(d(2025, 1, 3), 1.0, 1.0));
        cache.set_price(ITEM, point(d(2025, 1, 5), 2.0, 1.0));

        let range = cache.get_price_range(ITEM, d(2025, 1, 1), d(2025, 1, 31));
        let dates: Vec<NaiveDate> = range.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2025, 1, 3), d(2025, 1, 5), d(2025, 1, 7)]);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let mut cache = PriceCache::new();
        cache.set_prices(
            ITEM,
            &[
                point(d(2025, 1, 3), 1.0, 1.0),
                point(d(2025, 1, 5), 2.0, 1.0),
                point(d(2025, 1, 7), 3.0, 1.0),
            ],
        );
        let range = cache.get_price_range(ITEM, d(2025, 1, 3), d(2025, 1, 5));
        assert_eq!(range.len(), 2);
    }

    #[test]
    fn history_head_is_most_recent_point() {
        let mut cache = PriceCache::new();
        cache.set_price(ITEM, point(d(2025, 1, 3), 1.0, 1.0));
        cache.set_price(ITEM, point(d(2025, 1, 7), 3.0, 1.0));

        let head = cache.history_head(ITEM).unwrap();
        assert_eq!(head.price, 3.0);
        assert_eq!(head.date, d(2025, 1, 7).and_time(NaiveTime::MIN).and_utc());
        assert!(cache.history_head("other").is_none());
    }

    #[test]
    fn quick_snapshot_roundtrip() {
        let mut cache = PriceCache::new();
        assert!(cache.quick_snapshot(ITEM).is_none());
        let snapshot = PriceSnapshot {
            date: d(2025, 1, 8).and_time(NaiveTime::MIN).and_utc(),
            price: 12.5,
        };
        cache.set_quick_snapshot(ITEM, snapshot.clone());
        assert_eq!(cache.quick_snapshot(ITEM), Some(&snapshot));
    }

    #[test]
    fn freshness_tracking() {
        let mut cache = PriceCache::new();
        let today = d(2025, 1, 8);
        assert!(!cache.is_today_fresh(ITEM, today));
        cache.mark_updated_today(ITEM, today);
        assert!(cache.is_today_fresh(ITEM, today));
        assert!(!cache.is_today_fresh(ITEM, today + Duration::days(1)));
    }

    #[test]
    fn prune_before_drops_old_entries() {
        let mut cache = PriceCache::new();
        cache.set_prices(
            ITEM,
            &[
                point(d(2025, 1, 1), 1.0, 1.0),
                point(d(2025, 1, 5), 2.0, 1.0),
                point(d(2025, 1, 9), 3.0, 1.0),
            ],
        );
        let removed = cache.prune_before(d(2025, 1, 5));
        assert_eq!(removed, 1);
        assert_eq!(cache.total_entries(), 2);
        assert_eq!(cache.get_price(ITEM, d(2025, 1, 1)), None);
        assert_eq!(cache.get_price(ITEM, d(2025, 1, 5)), Some(2.0));
    }

    #[test]
    fn clear_empties_everything() {
        let mut cache = PriceCache::new();
        cache.set_price(ITEM, point(d(2025, 1, 1), 1.0, 1.0));
        cache.mark_updated_today(ITEM, d(2025, 1, 1));
        cache.clear();
        assert_eq!(cache.total_entries(), 0);
        assert_eq!(cache.item_count(), 0);
        assert!(!cache.is_today_fresh(ITEM, d(2025, 1, 1)));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  ChartRange
// ═══════════════════════════════════════════════════════════════════

mod chart_range {
    use super::*;

    fn now() -> chrono::DateTime<chrono::Utc> {
        d(2025, 1, 15).and_time(NaiveTime::MIN).and_utc()
    }

    #[test]
    fn week_is_seven_days_back() {
        let (from, to) = ChartRange::Week.bounds(now(), None);
        assert_eq!(from.unwrap().date_naive(), d(2025, 1, 8));
        assert_eq!(to, now());
    }

    #[test]
    fn month_is_thirty_days_back() {
        let (from, _) = ChartRange::Month.bounds(now(), None);
        assert_eq!(from.unwrap().date_naive(), d(2024, 12, 16));
    }

    #[test]
    fn year_is_365_days_back() {
        let (from, _) = ChartRange::Year.bounds(now(), None);
        assert_eq!(from.unwrap().date_naive(), d(2024, 1, 16));
    }

    #[test]
    fn all_uses_inception_when_known() {
        let inception = d(2023, 5, 1).and_time(NaiveTime::MIN).and_utc();
        let (from, _) = ChartRange::All.bounds(now(), Some(inception));
        assert_eq!(from, Some(inception));

        let (from, _) = ChartRange::All.bounds(now(), None);
        assert!(from.is_none());
    }

    #[test]
    fn serde_roundtrip_json() {
        for range in [ChartRange::Week, ChartRange::Month, ChartRange::Year, ChartRange::All] {
            let json = serde_json::to_string(&range).unwrap();
            let back: ChartRange = serde_json::from_str(&json).unwrap();
            assert_eq!(range, back);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Series records
// ═══════════════════════════════════════════════════════════════════

mod series_records {
    use super::*;

    #[test]
    fn day_bucket_serde_roundtrip() {
        let bucket = DayBucket {
            day_epoch: 1_736_035_200_000,
            sample_count: 2,
            sum_price: 30.0,
            price: 15.0,
            volume: 12.0,
        };
        let json = serde_json::to_string(&bucket).unwrap();
        let back: DayBucket = serde_json::from_str(&json).unwrap();
        assert_eq!(bucket, back);
    }

    #[test]
    fn dense_point_serde_roundtrip() {
        let point = DenseSeriesPoint {
            day_epoch: 1_736_035_200_000,
            price: 15.0,
            volume: 12.0,
        };
        let json = serde_json::to_string(&point).unwrap();
        let back: DenseSeriesPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(point, back);
    }
}
