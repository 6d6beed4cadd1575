use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::core::config::{ProvidersConfig, SpotPageConfig};
use crate::core::metal::Metal;
use crate::core::price::SpotPriceProvider;

/// Marker looked up on a page when the config does not name one.
pub const DEFAULT_MARKER: &str = "price-per-gram";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const FETCH_ATTEMPTS: usize = 3;
const RETRY_DELAY_MS: u64 = 500;

/// Finds the first price figure after `marker` in the page body.
fn extract_price_after(body: &str, marker: &str) -> Option<f64> {
    let start = body.find(marker)? + marker.len();
    let tail = &body[start..];
    let digits_at = tail.find(|c: char| c.is_ascii_digit())?;
    parse_price_token(&tail[digits_at..])
}

/// Parses a price figure starting at a digit.
///
/// Dealer pages mix digit styles: `41250.5`, `41,250.50`, `41 250,50` and
/// `41.250,50` all parse to the same number. A single separator followed by
/// exactly three digits is read as a thousands grouping.
fn parse_price_token(s: &str) -> Option<f64> {
    let token: String = s
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | ' ' | '\u{a0}'))
        .collect();
    let compact: String = token
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}'))
        .collect();
    let compact = compact.trim_end_matches(['.', ',']);
    if compact.is_empty() {
        return None;
    }

    let last_dot = compact.rfind('.');
    let last_comma = compact.rfind(',');

    let normalized = match (last_dot, last_comma) {
        (Some(d), Some(c)) => {
            // Both present: the later one is the decimal point.
            let (dec, grp) = if d > c { ('.', ',') } else { (',', '.') };
            let cleaned: String = compact.chars().filter(|&ch| ch != grp).collect();
            cleaned.replace(dec, ".")
        }
        (Some(pos), None) | (None, Some(pos)) => {
            let sep = char::from(compact.as_bytes()[pos]);
            let single = compact.matches(sep).count() == 1;
            let trailing = compact.len() - pos - 1;
            if single && trailing != 3 {
                compact.replace(sep, ".")
            } else {
                compact.chars().filter(|&ch| ch != sep).collect()
            }
        }
        (None, None) => compact.to_string(),
    };

    normalized.parse().ok()
}

/// Scrapes dealer pages for spot prices, one configured page per metal.
pub struct SpotPageProvider {
    gold: Option<SpotPageConfig>,
    silver: Option<SpotPageConfig>,
}

impl SpotPageProvider {
    pub fn new(providers: &ProvidersConfig) -> Self {
        SpotPageProvider {
            gold: providers.gold.clone(),
            silver: providers.silver.clone(),
        }
    }

    fn page_for(&self, metal: Metal) -> Option<&SpotPageConfig> {
        match metal {
            Metal::Gold => self.gold.as_ref(),
            Metal::Silver => self.silver.as_ref(),
        }
    }
}

async fn get_with_retry(
    client: &reqwest::Client,
    url: &str,
    attempts: usize,
) -> Result<reqwest::Response, reqwest::Error> {
    let mut attempt = 1;
    loop {
        match client.get(url).send().await {
            Ok(response) => return Ok(response),
            Err(err) => {
                if attempt >= attempts {
                    return Err(err);
                }
                debug!(
                    "Attempt {}/{} for {} failed: {}. Retrying...",
                    attempt, attempts, url, err
                );
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS)).await;
            }
        }
    }
}

#[async_trait]
impl SpotPriceProvider for SpotPageProvider {
    async fn fetch_price(&self, metal: Metal) -> Result<f64> {
        let page = self
            .page_for(metal)
            .ok_or_else(|| anyhow!("No {} page configured", metal))?;
        let marker = page.marker.as_deref().unwrap_or(DEFAULT_MARKER);

        debug!("Requesting {} spot page {}", metal, page.url);
        let client = reqwest::Client::builder()
            .user_agent("ingot/0.2")
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let response = get_with_retry(&client, &page.url, FETCH_ATTEMPTS)
            .await
            .with_context(|| format!("Failed to fetch {} page: {}", metal, page.url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for {} page: {}",
                response.status(),
                metal,
                page.url
            ));
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read {} page body", metal))?;
        if body.trim().is_empty() {
            return Err(anyhow!("Received empty {} page from {}", metal, page.url));
        }

        let price = extract_price_after(&body, marker).ok_or_else(|| {
            anyhow!(
                "No price found after marker '{}' on {} page: {}",
                marker,
                metal,
                page.url
            )
        })?;
        if price <= 0.0 {
            return Err(anyhow!(
                "Non-positive {} price {} on page: {}",
                metal,
                price,
                page.url
            ));
        }

        debug!("Fetched {} spot price: {}", metal, price);
        Ok(price)
    }
}
