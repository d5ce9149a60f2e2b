//! HTTP implementation of the quote provider.
//!
//! Speaks a SmartAPI-style JSON protocol: `POST /session` to authenticate,
//! `POST /search` for instrument lookup, `POST /candles` for daily history
//! with row-array payloads `[time, open, high, low, close, volume]`. The base
//! URL is injectable so tests can stand up a mock server.

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::{get_provider_base_url, ProviderCredentials};
use crate::error::ProviderError;
use crate::models::bar::Bar;
use crate::services::quote_provider::{FetchThrottle, InstrumentMatch, QuoteProvider};

const DAILY_INTERVAL: &str = "ONE_DAY";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

pub struct RestQuoteProvider {
    http: reqwest::Client,
    base_url: String,
    credentials: ProviderCredentials,
    session_token: RwLock<Option<String>>,
    throttle: Arc<FetchThrottle>,
}

impl RestQuoteProvider {
    pub fn new(
        base_url: impl Into<String>,
        credentials: ProviderCredentials,
        throttle: Arc<FetchThrottle>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            session_token: RwLock::new(None),
            throttle,
        }
    }

    pub fn from_env(throttle: Arc<FetchThrottle>) -> Self {
        Self::new(
            get_provider_base_url(),
            ProviderCredentials::from_env(),
            throttle,
        )
    }

    async fn bearer(&self) -> Result<String, ProviderError> {
        self.session_token
            .read()
            .await
            .as_ref()
            .map(|token| format!("Bearer {}", token))
            .ok_or_else(|| ProviderError::Auth("no active session".to_string()))
    }
}

#[derive(Serialize)]
struct SessionRequest<'a> {
    clientcode: &'a str,
    pin: &'a str,
}

#[derive(Deserialize)]
struct SessionEnvelope {
    data: Option<SessionData>,
}

#[derive(Deserialize)]
struct SessionData {
    #[serde(rename = "jwtToken")]
    jwt_token: Option<String>,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    exchange: &'a str,
    tradingsymbol: &'a str,
}

#[derive(Deserialize)]
struct SearchEnvelope {
    data: Option<Vec<SearchRow>>,
}

#[derive(Deserialize)]
struct SearchRow {
    #[serde(rename = "tradingsymbol")]
    trading_symbol: String,
    #[serde(rename = "symboltoken")]
    token: String,
}

#[derive(Serialize)]
struct CandleRequest<'a> {
    exchange: &'a str,
    symboltoken: &'a str,
    interval: &'a str,
    fromdate: String,
    todate: String,
}

#[derive(Deserialize)]
struct CandleEnvelope {
    data: Option<Vec<Vec<Value>>>,
}

#[async_trait::async_trait]
impl QuoteProvider for RestQuoteProvider {
    async fn ensure_session(&self) -> Result<(), ProviderError> {
        if self.session_token.read().await.is_some() {
            return Ok(());
        }

        let mut slot = self.session_token.write().await;
        // Another caller may have won the race while we waited for the lock.
        if slot.is_some() {
            return Ok(());
        }

        let response = self
            .http
            .post(format!("{}/session", self.base_url))
            .header("X-PrivateKey", &self.credentials.api_key)
            .json(&SessionRequest {
                clientcode: &self.credentials.client_code,
                pin: &self.credentials.pin,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Auth(format!(
                "session request returned {}",
                response.status()
            )));
        }

        let envelope: SessionEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::Auth(format!("unreadable session response: {}", e)))?;
        let token = envelope
            .data
            .and_then(|d| d.jwt_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ProviderError::Auth("session response carried no jwt token".to_string())
            })?;

        debug!("provider session established");
        *slot = Some(token);
        Ok(())
    }

    async fn search_token(
        &self,
        exchange: &str,
        trading_symbol: &str,
    ) -> Result<Vec<InstrumentMatch>, ProviderError> {
        let bearer = self.bearer().await?;
        self.throttle.acquire().await;

        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .header(AUTHORIZATION, bearer)
            .header("X-PrivateKey", &self.credentials.api_key)
            .json(&SearchRequest {
                exchange,
                tradingsymbol: trading_symbol,
            })
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        let envelope: SearchEnvelope = serde_json::from_value(body)
            .map_err(|e| ProviderError::Shape(format!("search response: {}", e)))?;

        Ok(envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|row| InstrumentMatch {
                trading_symbol: row.trading_symbol,
                token: row.token,
            })
            .collect())
    }

    async fn fetch_daily_bars(
        &self,
        exchange: &str,
        token: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Bar>, ProviderError> {
        let bearer = self.bearer().await?;
        self.throttle.acquire().await;

        let response = self
            .http
            .post(format!("{}/candles", self.base_url))
            .header(AUTHORIZATION, bearer)
            .header("X-PrivateKey", &self.credentials.api_key)
            .json(&CandleRequest {
                exchange,
                symboltoken: token,
                interval: DAILY_INTERVAL,
                fromdate: from.format(DATE_FORMAT).to_string(),
                todate: to.format(DATE_FORMAT).to_string(),
            })
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        let envelope: CandleEnvelope = serde_json::from_value(body)
            .map_err(|e| ProviderError::Shape(format!("candle response: {}", e)))?;

        let rows = envelope.data.unwrap_or_default();
        let mut bars = rows
            .iter()
            .map(|row| parse_candle_row(row))
            .collect::<Result<Vec<_>, _>>()?;
        bars.sort_by_key(|bar| bar.time);

        debug!(token, count = bars.len(), "fetched daily bars");
        Ok(bars)
    }
}

fn parse_candle_row(row: &[Value]) -> Result<Bar, ProviderError> {
    let raw_time = row
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::Shape("candle row missing timestamp".to_string()))?;
    let time = parse_candle_time(raw_time)?;

    let price = |index: usize, name: &str| -> Result<f64, ProviderError> {
        numeric(row.get(index))
            .ok_or_else(|| ProviderError::Shape(format!("candle row missing {}", name)))
    };

    Ok(Bar {
        time,
        open: price(1, "open")?,
        high: price(2, "high")?,
        low: price(3, "low")?,
        close: price(4, "close")?,
        volume: numeric(row.get(5)),
    })
}

/// Accepts numbers or numeric strings; the provider has been seen to use both.
fn numeric(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}

fn parse_candle_time(raw: &str) -> Result<DateTime<Utc>, ProviderError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(ProviderError::Shape(format!(
        "unparseable candle timestamp: {}",
        raw
    )))
}
