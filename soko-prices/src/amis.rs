//! Client for the daily AMIS (Agricultural Market Information System) price feed.
//!
//! The feed is expected to answer with a price CSV in the same layout that
//! [`PriceRecord::parse_price_csv`] reads.

use crate::error::{PriceError, Result};
use crate::record::{PriceRecord, DATE_FORMAT};
use chrono::NaiveDate;
use log::{info, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const DEFAULT_MAX_TRIES: u32 = 3;
pub const DEFAULT_BACKOFF_MILLIS: u64 = 1000;
const REQUEST_TIMEOUT_SECS: u64 = 60;

pub struct AmisClient {
    client: Client,
    base_url: String,
    max_tries: u32,
    backoff: Duration,
}

impl AmisClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(AmisClient {
            client,
            base_url: base_url.into(),
            max_tries: DEFAULT_MAX_TRIES,
            backoff: Duration::from_millis(DEFAULT_BACKOFF_MILLIS),
        })
    }

    /// Override the attempt count (minimum 1) and the initial backoff.
    pub fn with_retries(mut self, max_tries: u32, backoff: Duration) -> Self {
        self.max_tries = max_tries.max(1);
        self.backoff = backoff;
        self
    }

    /// URL for a given observation date, or the latest prices when `None`.
    pub fn daily_url(&self, date: Option<NaiveDate>) -> String {
        match date {
            Some(d) => format!("{}?date={}", self.base_url, d.format(DATE_FORMAT)),
            None => self.base_url.clone(),
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<PriceRecord>> {
        let response = self.client.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(PriceError::BadStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        if body.len() <= 2 {
            return Err(PriceError::EmptyResponse(url.to_string()));
        }
        PriceRecord::parse_price_csv(&body)
    }

    /// Fetch the daily price list, retrying with exponential backoff.
    pub async fn fetch_daily_prices(&self, date: Option<NaiveDate>) -> Result<Vec<PriceRecord>> {
        let url = self.daily_url(date);
        let mut sleep_for = self.backoff;

        for attempt in 1..=self.max_tries {
            match self.fetch_once(&url).await {
                Ok(records) => {
                    info!("Fetched {} price records from {}", records.len(), url);
                    return Ok(records);
                }
                Err(e) => {
                    warn!("Attempt {}/{}: {}", attempt, self.max_tries, e);
                }
            }

            if attempt < self.max_tries {
                info!("Sleeping for {:?} before retrying {}", sleep_for, url);
                tokio::time::sleep(sleep_for).await;
                sleep_for *= 2;
            }
        }

        warn!("All attempts failed for {}", url);
        Err(PriceError::RetriesExhausted(self.max_tries))
    }
}
