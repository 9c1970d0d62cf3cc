//! Lunar-age client for the tide736.net tide API

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use serde::{de, Deserialize, Deserializer};
use shared::validate_moon_age;

use super::http::{get_json, FetchError, RetryPolicy};
use super::LunarAgeSource;
use crate::config::Config;

/// tide736.net API client
#[derive(Clone)]
pub struct TideClient {
    client: Client,
    base_url: String,
    prefecture_code: u32,
    harbor_code: u32,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
pub struct TideResponse {
    tide: TideChart,
}

#[derive(Debug, Deserialize)]
struct TideChart {
    chart: HashMap<String, ChartDetail>,
}

#[derive(Debug, Deserialize)]
struct ChartDetail {
    moon: MoonInfo,
}

#[derive(Debug, Deserialize)]
struct MoonInfo {
    #[serde(deserialize_with = "number_or_numeric_string")]
    age: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// The API has served the age both as `24.3` and as `"24.3"`
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("moon age {:?} is not a number", text))),
    }
}

impl TideClient {
    pub fn new(
        client: Client,
        base_url: String,
        prefecture_code: u32,
        harbor_code: u32,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            base_url,
            prefecture_code,
            harbor_code,
            retry,
        }
    }

    pub fn from_config(client: Client, config: &Config) -> Self {
        Self::new(
            client,
            config.tide.api_endpoint.clone(),
            config.tide.prefecture_code,
            config.tide.harbor_code,
            RetryPolicy::from(&config.http),
        )
    }

    fn query(&self, date: NaiveDate) -> [(&'static str, String); 6] {
        [
            ("pc", self.prefecture_code.to_string()),
            ("hc", self.harbor_code.to_string()),
            ("yr", date.year().to_string()),
            ("mn", date.month().to_string()),
            ("dy", date.day().to_string()),
            ("rg", "day".to_string()),
        ]
    }
}

#[async_trait]
impl LunarAgeSource for TideClient {
    async fn fetch_moon_age(&self, date: NaiveDate) -> Result<f64, FetchError> {
        let data: TideResponse =
            get_json(&self.client, &self.retry, &self.base_url, &self.query(date)).await?;

        let age = data.moon_age(date).ok_or(FetchError::NotFound { date })?;
        validate_moon_age(age).map_err(|message| FetchError::Schema {
            url: self.base_url.clone(),
            message: message.to_string(),
        })?;
        Ok(age)
    }
}

impl TideResponse {
    /// Lunar age for `date`, keyed by its ISO date string in the chart
    pub fn moon_age(&self, date: NaiveDate) -> Option<f64> {
        self.tide
            .chart
            .get(&date.format("%Y-%m-%d").to_string())
            .map(|detail| detail.moon.age)
    }
}
