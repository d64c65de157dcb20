//! FinMind Open API 클라이언트.
//!
//! 대만 증시 일별 시세와 PER/PBR 데이터를 수집합니다.
//!
//! # 응답 형식
//!
//! ```json
//! { "msg": "success", "status": 200, "data": [ { "date": "2023-06-01", ... } ] }
//! ```
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use auction_data::provider::FinMindClient;
//!
//! let client = FinMindClient::new(Some("TOKEN".to_string()))?;
//! let prices = client.fetch_daily_prices(&"2330".into(), start, end).await?;
//! ```

use crate::error::{DataError, Result};
use auction_core::{decimal_from_f64, format_date, parse_date, PriceRecord, SecurityId, ValuationRecord};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// FinMind API 기본 주소.
pub const FINMIND_BASE_URL: &str = "https://api.finmindtrade.com";

const DATA_PATH: &str = "/api/v4/data";
const SUCCESS_MSG: &str = "success";

/// FinMind 데이터셋.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinMindDataset {
    /// 일별 시세
    StockPrice,
    /// PER/PBR/배당수익률
    StockPer,
}

impl FinMindDataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StockPrice => "TaiwanStockPrice",
            Self::StockPer => "TaiwanStockPER",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    msg: String,
    #[serde(default)]
    status: Option<i64>,
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

/// `TaiwanStockPrice` 응답 행.
#[derive(Debug, Clone, Deserialize)]
pub struct FinMindPrice {
    pub date: String,
    pub stock_id: String,
    #[serde(rename = "Trading_Volume", default)]
    pub trading_volume: Option<i64>,
    #[serde(rename = "Trading_money", default)]
    pub trading_money: Option<f64>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    pub close: f64,
    #[serde(default)]
    pub spread: Option<f64>,
    #[serde(rename = "Trading_turnover", default)]
    pub trading_turnover: Option<f64>,
}

impl FinMindPrice {
    /// 도메인 레코드로 변환합니다. 날짜나 종가가 잘못되면 `None`.
    pub fn into_record(self) -> Option<PriceRecord> {
        let date = parse_date(&self.date)?;
        let close = decimal_from_f64(self.close)?;
        Some(PriceRecord {
            date,
            security: SecurityId::new(self.stock_id),
            volume: self.trading_volume,
            trading_value: self.trading_money.and_then(decimal_from_f64),
            open: self.open.and_then(decimal_from_f64),
            high: self.max.and_then(decimal_from_f64),
            low: self.min.and_then(decimal_from_f64),
            close,
            change: self.spread.and_then(decimal_from_f64),
            trade_count: self.trading_turnover.map(|v| v as i64),
        })
    }
}

/// `TaiwanStockPER` 응답 행.
#[derive(Debug, Clone, Deserialize)]
pub struct FinMindPer {
    pub date: String,
    pub stock_id: String,
    #[serde(default)]
    pub dividend_yield: Option<f64>,
    #[serde(rename = "PER", default)]
    pub per: Option<f64>,
    #[serde(rename = "PBR", default)]
    pub pbr: Option<f64>,
}

impl FinMindPer {
    /// 도메인 레코드로 변환합니다. 날짜가 잘못되면 `None`.
    pub fn into_record(self) -> Option<ValuationRecord> {
        Some(ValuationRecord {
            date: parse_date(&self.date)?,
            security: SecurityId::new(self.stock_id),
            dividend_yield: self.dividend_yield.and_then(decimal_from_f64),
            per: self.per.and_then(decimal_from_f64),
            pbr: self.pbr.and_then(decimal_from_f64),
        })
    }
}

/// FinMind API 클라이언트.
#[derive(Clone)]
pub struct FinMindClient {
    client: reqwest::Client,
    token: Option<String>,
    base_url: String,
    max_retries: u32,
}

impl FinMindClient {
    /// 새 클라이언트를 생성합니다. 토큰이 없으면 익명 요청(호출 한도 낮음).
    pub fn new(token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DataError::FetchError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            token: token.filter(|t| !t.is_empty()),
            base_url: FINMIND_BASE_URL.to_string(),
            max_retries: 3,
        })
    }

    /// API 주소를 바꿉니다 (테스트/프록시용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// 최대 시도 횟수 (최소 1).
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// 일별 시세를 조회합니다.
    pub async fn fetch_daily_prices(
        &self,
        security: &SecurityId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceRecord>> {
        let rows: Vec<FinMindPrice> = self
            .request_with_retry(FinMindDataset::StockPrice, security, start, end)
            .await?;
        Ok(rows.into_iter().filter_map(FinMindPrice::into_record).collect())
    }

    /// PER/PBR/배당수익률을 조회합니다.
    pub async fn fetch_per_pbr(
        &self,
        security: &SecurityId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ValuationRecord>> {
        let rows: Vec<FinMindPer> = self
            .request_with_retry(FinMindDataset::StockPer, security, start, end)
            .await?;
        Ok(rows.into_iter().filter_map(FinMindPer::into_record).collect())
    }

    /// 재시도 포함 요청.
    ///
    /// 실패 시 `500ms × 시도 횟수`만큼 대기 후 다시 시도합니다.
    async fn request_with_retry<T: DeserializeOwned>(
        &self,
        dataset: FinMindDataset,
        security: &SecurityId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<T>> {
        let mut attempt = 1;
        loop {
            match self.request(dataset, security, start, end).await {
                Ok(rows) => return Ok(rows),
                Err(e) if attempt < self.max_retries => {
                    debug!(
                        dataset = dataset.as_str(),
                        security = %security,
                        attempt = attempt,
                        max_retries = self.max_retries,
                        error = %e,
                        "FinMind 요청 재시도 예정"
                    );
                    tokio::time::sleep(Duration::from_millis(500 * attempt as u64)).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(
                        dataset = dataset.as_str(),
                        security = %security,
                        attempts = attempt,
                        error = %e,
                        "FinMind 요청 최종 실패"
                    );
                    return Err(e);
                }
            }
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        dataset: FinMindDataset,
        security: &SecurityId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<T>> {
        let url = format!("{}{}", self.base_url, DATA_PATH);
        let start_date = format_date(start);
        let end_date = format_date(end);

        let mut params = vec![
            ("dataset", dataset.as_str()),
            ("data_id", security.as_str()),
            ("start_date", start_date.as_str()),
            ("end_date", end_date.as_str()),
        ];
        if let Some(token) = &self.token {
            params.push(("token", token.as_str()));
        }

        debug!(
            dataset = dataset.as_str(),
            security = %security,
            start = %start_date,
            end = %end_date,
            "FinMind API 요청"
        );

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::FetchError(format!(
                "FinMind API 오류 [{}]: {} - {}",
                dataset.as_str(),
                status,
                body
            )));
        }

        let body: ApiResponse<T> = response.json().await?;
        if body.msg != SUCCESS_MSG {
            return Err(DataError::FetchError(format!(
                "FinMind API 응답 실패 [{}]: {} (status={:?})",
                dataset.as_str(),
                body.msg,
                body.status
            )));
        }

        debug!(
            dataset = dataset.as_str(),
            security = %security,
            rows = body.data.len(),
            "FinMind API 응답 수신"
        );
        Ok(body.data)
    }
}
