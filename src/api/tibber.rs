//! Tibber GraphQL API: today's and tomorrow's hourly prices of the first home.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use itertools::Itertools;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::{
    api::client,
    core::{
        price_table::{HourlyPrice, PriceSchedule},
        provider::PriceProvider,
    },
    prelude::*,
    quantity::price::KilowattHourPrice,
};

pub struct Api {
    client: reqwest::Client,
    url: Url,
    access_token: String,
}

impl Api {
    pub fn new(url: Url, access_token: String) -> Result<Self> {
        Ok(Self { client: client::try_new()?, url, access_token })
    }
}

#[async_trait]
impl PriceProvider for Api {
    #[instrument(skip_all, fields(url = %self.url))]
    async fn get_prices(&self) -> Result<PriceSchedule> {
        info!("fetching…");
        let schedule = self
            .client
            .post(self.url.clone())
            .bearer_auth(&self.access_token)
            .json(&Request::PRICE_INFO)
            .send()
            .await
            .context("failed to request the prices")?
            .error_for_status()?
            .json::<Response>()
            .await
            .context("failed to deserialize the prices")?
            .into_schedule()?;
        info!(
            n_today = schedule.today.len(),
            n_tomorrow = schedule.tomorrow.as_ref().map_or(0, Vec::len),
            "fetched",
        );
        Ok(schedule)
    }
}

#[derive(Serialize)]
struct Request {
    query: &'static str,
}

impl Request {
    const PRICE_INFO: Self = Self {
        query: "{viewer{homes{currentSubscription{priceInfo{today{total startsAt} tomorrow{total startsAt}}}}}}",
    };
}

#[derive(Deserialize)]
struct Response {
    data: Option<Data>,

    #[serde(default)]
    errors: Vec<GraphQlError>,
}

impl Response {
    fn into_schedule(self) -> Result<PriceSchedule> {
        if !self.errors.is_empty() {
            bail!("Tibber API error: {}", self.errors.iter().map(|error| &error.message).join("; "));
        }
        let price_info = self
            .data
            .context("the response contains no data")?
            .viewer
            .homes
            .into_iter()
            .next()
            .context("the account has no homes")?
            .current_subscription
            .context("the home has no active subscription")?
            .price_info;
        Ok(PriceSchedule::from_days(
            price_info.today.into_iter().map(Entry::into_hourly_price).collect(),
            price_info.tomorrow.into_iter().map(Entry::into_hourly_price).collect(),
        ))
    }
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct Data {
    viewer: Viewer,
}

#[derive(Deserialize)]
struct Viewer {
    homes: Vec<Home>,
}

#[derive(Deserialize)]
struct Home {
    #[serde(rename = "currentSubscription")]
    current_subscription: Option<Subscription>,
}

#[derive(Deserialize)]
struct Subscription {
    #[serde(rename = "priceInfo")]
    price_info: PriceInfo,
}

#[serde_as]
#[derive(Deserialize)]
struct PriceInfo {
    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    today: Vec<Entry>,

    /// Empty or `null` until published in the afternoon.
    #[serde_as(as = "serde_with::DefaultOnNull")]
    #[serde(default)]
    tomorrow: Vec<Entry>,
}

/// Price entry which keeps its place in the day even when it cannot be parsed.
#[derive(Deserialize)]
#[serde(untagged)]
enum Entry {
    Valid(Price),
    Malformed(serde_json::Value),
}

impl Entry {
    fn into_hourly_price(self) -> Option<HourlyPrice> {
        match self {
            Self::Valid(price) => Some(HourlyPrice { starts_at: price.starts_at, price: price.total }),
            Self::Malformed(value) => {
                debug!(%value, "malformed price entry");
                None
            }
        }
    }
}

#[derive(Deserialize)]
struct Price {
    total: KilowattHourPrice,

    #[serde(rename = "startsAt")]
    starts_at: DateTime<FixedOffset>,
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    use super::*;

    #[test]
    fn deserialize_prices_ok() -> Result {
        // language=json
        let body = r#"{
            "data": {
                "viewer": {
                    "homes": [
                        {
                            "currentSubscription": {
                                "priceInfo": {
                                    "today": [
                                        {"total": 0.2412, "startsAt": "2025-01-15T00:00:00.000+01:00"},
                                        {"total": null, "startsAt": "2025-01-15T01:00:00.000+01:00"},
                                        {"total": 0.2254, "startsAt": "2025-01-15T02:00:00.000+01:00"}
                                    ],
                                    "tomorrow": []
                                }
                            }
                        }
                    ]
                }
            }
        }"#;
        let schedule = serde_json::from_str::<Response>(body)?.into_schedule()?;
        assert_eq!(schedule.today.len(), 3);
        assert!(schedule.tomorrow.is_none());

        let first = schedule.today[0].context("the first entry must be valid")?;
        assert_eq!(first.price, KilowattHourPrice(0.2412));
        assert_eq!(first.starts_at.hour(), 0);
        assert!(schedule.today[1].is_none());
        assert_eq!(schedule.today[2].map(|entry| entry.price), Some(KilowattHourPrice(0.2254)));
        Ok(())
    }

    #[test]
    fn deserialize_null_days_ok() -> Result {
        // language=json
        let body = r#"{
            "data": {
                "viewer": {
                    "homes": [
                        {
                            "currentSubscription": {
                                "priceInfo": {
                                    "today": [{"total": 1, "startsAt": "2025-01-15T00:00:00+01:00"}],
                                    "tomorrow": null
                                }
                            }
                        }
                    ]
                }
            }
        }"#;
        let schedule = serde_json::from_str::<Response>(body)?.into_schedule()?;
        assert_eq!(schedule.today[0].map(|entry| entry.price), Some(KilowattHourPrice(1.0)));
        assert!(schedule.tomorrow.is_none());
        Ok(())
    }

    #[test]
    fn deserialize_tomorrow_ok() -> Result {
        // language=json
        let body = r#"{
            "data": {
                "viewer": {
                    "homes": [
                        {
                            "currentSubscription": {
                                "priceInfo": {
                                    "today": [],
                                    "tomorrow": [
                                        {"total": 0.1, "startsAt": "2025-01-16T00:00:00.000+01:00"},
                                        {"total": "n/a", "startsAt": "2025-01-16T01:00:00.000+01:00"}
                                    ]
                                }
                            }
                        }
                    ]
                }
            }
        }"#;
        let schedule = serde_json::from_str::<Response>(body)?.into_schedule()?;
        let tomorrow = schedule.tomorrow.context("tomorrow must be present")?;
        assert_eq!(tomorrow.len(), 2);
        assert!(tomorrow[0].is_some());
        assert!(tomorrow[1].is_none());
        Ok(())
    }

    #[test]
    fn graphql_errors_fail() -> Result {
        // language=json
        let body = r#"{
            "errors": [{"message": "Context creation failed: invalid token", "extensions": {"code": "UNAUTHENTICATED"}}],
            "data": null
        }"#;
        let error = serde_json::from_str::<Response>(body)?.into_schedule().unwrap_err();
        assert!(error.to_string().contains("invalid token"));
        Ok(())
    }

    #[test]
    fn missing_subscription_fails() -> Result {
        // language=json
        let body = r#"{"data": {"viewer": {"homes": [{"currentSubscription": null}]}}}"#;
        assert!(serde_json::from_str::<Response>(body)?.into_schedule().is_err());
        Ok(())
    }

    #[tokio::test]
    #[ignore = "makes the API request"]
    async fn get_prices_ok() -> Result {
        let api = Api::new(
            Url::parse("https://api.tibber.com/v1-beta/gql")?,
            std::env::var("TIBBER_ACCESS_TOKEN")?,
        )?;
        let schedule = api.get_prices().await?;
        assert!(!schedule.today.is_empty());
        Ok(())
    }
}
