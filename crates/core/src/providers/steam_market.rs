use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::traits::MarketDataProvider;
use crate::errors::CoreError;
use crate::models::price::PricePoint;

const BASE_URL: &str = "https://steamcommunity.com/market";

/// CS:GO app id on Steam.
const APP_ID: u32 = 730;

/// USD on the Steam currency enum.
const CURRENCY_USD: u32 = 1;

/// Steam Community Market provider.
///
/// - **`/priceoverview`**: fast single read — lowest/median price and 24h
///   volume. No auth required, but aggressively rate limited.
/// - **`/pricehistory`**: the official daily median-price history. Rows come
///   as `["Dec 05 2013 01: +0", 1.25, "250"]` triples; recent days may carry
///   multiple intra-day rows, which the daily aggregator downstream folds
///   into one bucket per day.
pub struct SteamMarketProvider {
    client: Client,
}

impl SteamMarketProvider {
    pub fn new() -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for SteamMarketProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Steam API response types ────────────────────────────────────────

#[derive(Deserialize)]
struct PriceOverviewResponse {
    success: bool,
    lowest_price: Option<String>,
    median_price: Option<String>,
    /// 24h trade volume, e.g. "1,234"
    volume: Option<String>,
}

#[derive(Deserialize)]
struct PriceHistoryResponse {
    success: bool,
    /// Rows of [date string, price, volume string]
    prices: Option<Vec<(String, f64, String)>>,
}

/// Parse a Steam money string like "$1.90" or "$1,234.56" into a float.
fn parse_money(s: &str) -> Option<f64> {
    s.trim()
        .trim_start_matches('$')
        .replace(',', "")
        .parse()
        .ok()
}

/// Parse a Steam volume string like "1,234" into a float.
fn parse_volume(s: &str) -> Option<f64> {
    s.trim().replace(',', "").parse().ok()
}

/// Parse a Steam history date like "Dec 05 2013 01: +0".
/// Only the "Mon DD YYYY" prefix carries the calendar day.
fn parse_history_date(s: &str) -> Option<NaiveDate> {
    let prefix = s.get(..11)?;
    NaiveDate::parse_from_str(prefix, "%b %d %Y").ok()
}

#[async_trait]
impl MarketDataProvider for SteamMarketProvider {
    fn name(&self) -> &str {
        "SteamMarket"
    }

    async fn get_current_price(&self, market_hash_name: &str) -> Result<f64, CoreError> {
        let url = format!("{BASE_URL}/priceoverview/");
        let resp: PriceOverviewResponse = self
            .client
            .get(&url)
            .query(&[
                ("appid", APP_ID.to_string()),
                ("currency", CURRENCY_USD.to_string()),
                ("market_hash_name", market_hash_name.to_string()),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "SteamMarket".into(),
                message: format!("Failed to parse price overview for {market_hash_name}: {e}"),
            })?;

        if !resp.success {
            return Err(CoreError::Api {
                provider: "SteamMarket".into(),
                message: format!("Price overview request rejected for {market_hash_name}"),
            });
        }

        // Prefer the lowest listing; fall back to the median when no
        // listings are up.
        let price = resp
            .lowest_price
            .as_deref()
            .and_then(parse_money)
            .or_else(|| resp.median_price.as_deref().and_then(parse_money))
            .ok_or_else(|| CoreError::PriceNotAvailable {
                item: market_hash_name.to_string(),
                date: "current".into(),
            })?;

        let volume = resp.volume.as_deref().and_then(parse_volume);
        debug!(item = market_hash_name, price, volume, "fetched price overview");

        Ok(price)
    }

    async fn get_price_history(
        &self,
        market_hash_name: &str,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let url = format!("{BASE_URL}/pricehistory/");
        let resp: PriceHistoryResponse = self
            .client
            .get(&url)
            .query(&[
                ("appid", APP_ID.to_string()),
                ("market_hash_name", market_hash_name.to_string()),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "SteamMarket".into(),
                message: format!("Failed to parse price history for {market_hash_name}: {e}"),
            })?;

        if !resp.success {
            return Err(CoreError::Api {
                provider: "SteamMarket".into(),
                message: format!("Price history request rejected for {market_hash_name}"),
            });
        }

        let rows = resp.prices.unwrap_or_default();
        let points: Vec<PricePoint> = rows
            .iter()
            .filter_map(|(date_str, price, volume_str)| {
                Some(PricePoint {
                    date: parse_history_date(date_str)?,
                    price: *price,
                    volume: parse_volume(volume_str).unwrap_or(0.0),
                })
            })
            .collect();

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_money_plain() {
        assert_eq!(parse_money("$1.90"), Some(1.90));
    }

    #[test]
    fn parse_money_thousands() {
        assert_eq!(parse_money("$1,234.56"), Some(1234.56));
    }

    #[test]
    fn parse_money_garbage() {
        assert_eq!(parse_money("N/A"), None);
    }

    #[test]
    fn parse_volume_thousands() {
        assert_eq!(parse_volume("1,234"), Some(1234.0));
    }

    #[test]
    fn price_overview_carries_volume() {
        let json = r#"{"success":true,"lowest_price":"$1.90","volume":"1,234","median_price":"$1.89"}"#;
        let resp: PriceOverviewResponse = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.volume.as_deref().and_then(parse_volume), Some(1234.0));
        assert_eq!(resp.lowest_price.as_deref().and_then(parse_money), Some(1.90));
    }

    #[test]
    fn parse_history_date_prefix() {
        let date = parse_history_date("Dec 05 2013 01: +0");
        assert_eq!(date, NaiveDate::from_ymd_opt(2013, 12, 5));
    }

    #[test]
    fn parse_history_date_too_short() {
        assert_eq!(parse_history_date("Dec 05"), None);
    }
}
