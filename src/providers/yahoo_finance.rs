use async_trait::async_trait;
use chrono::DateTime;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::error::ReturnsError;
use crate::core::price::{PriceBar, PriceHistoryProvider, RangeSpec};

/// Fetches daily price history from the Yahoo Finance chart API.
pub struct YahooFinanceProvider {
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str) -> Self {
        YahooFinanceProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

// Only timestamps and closes are modelled; other columns and events in the
// payload are ignored.
#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    result: Option<Vec<ChartItem>>,
    error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

impl ChartError {
    fn reason(&self) -> String {
        self.description
            .clone()
            .or_else(|| self.code.clone())
            .unwrap_or_else(|| "unknown provider error".to_string())
    }
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

fn extract_bars(item: &ChartItem) -> Vec<PriceBar> {
    let offset = item.meta.as_ref().map_or(0, |m| m.gmtoffset);

    let (Some(timestamps), Some(closes)) = (
        item.timestamp.as_ref(),
        item.indicators
            .as_ref()
            .and_then(|inds| inds.quote.first())
            .and_then(|q| q.close.as_ref()),
    ) else {
        return Vec::new();
    };

    timestamps
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let close = (*close)?;
            let date = DateTime::from_timestamp(ts + offset, 0)?.date_naive();
            Some(PriceBar::new(date, close))
        })
        .collect()
}

fn classify_error(
    symbol: &str,
    range: &RangeSpec,
    status: StatusCode,
    reason: String,
) -> ReturnsError {
    if status == StatusCode::UNPROCESSABLE_ENTITY || status == StatusCode::BAD_REQUEST {
        ReturnsError::invalid_range(range.as_token(), reason)
    } else {
        ReturnsError::unavailable(symbol, reason)
    }
}

#[async_trait]
impl PriceHistoryProvider for YahooFinanceProvider {
    #[instrument(
        name = "YahooHistoryFetch",
        skip(self),
        fields(symbol = %symbol, range = %range)
    )]
    async fn fetch_history(
        &self,
        symbol: &str,
        range: &RangeSpec,
    ) -> Result<Vec<PriceBar>, ReturnsError> {
        let url = format!(
            "{}/v8/finance/chart/{}?interval=1d&range={}",
            self.base_url,
            symbol,
            range.as_token()
        );
        debug!("Requesting price history from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("pfret/1.0")
            .build()
            .map_err(|e| ReturnsError::unavailable(symbol, format!("HTTP client error: {e}")))?;
        let response = client.get(&url).send().await.map_err(|e| {
            ReturnsError::unavailable(symbol, format!("Request error: {e} URL: {url}"))
        })?;

        let status = response.status();
        debug!(%status, "Received Yahoo response");

        let text = response.text().await.map_err(|e| {
            ReturnsError::unavailable(symbol, format!("Failed to read response: {e}"))
        })?;

        let data: YahooChartResponse = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(_) if !status.is_success() => {
                let reason = format!("HTTP error: {status}");
                return Err(classify_error(symbol, range, status, reason));
            }
            Err(e) => {
                return Err(ReturnsError::unavailable(
                    symbol,
                    format!("Failed to parse JSON response: {e}"),
                ));
            }
        };

        if let Some(error) = &data.chart.error {
            return Err(classify_error(symbol, range, status, error.reason()));
        }
        if !status.is_success() {
            let reason = format!("HTTP error: {status}");
            return Err(classify_error(symbol, range, status, reason));
        }

        let item = data
            .chart
            .result
            .as_ref()
            .and_then(|items| items.first())
            .ok_or_else(|| ReturnsError::unavailable(symbol, "No price data found"))?;

        let bars = extract_bars(item);
        if bars.is_empty() {
            return Err(ReturnsError::unavailable(symbol, "empty price history"));
        }
        debug!("Parsed {} bars", bars.len());
        Ok(bars)
    }
}
