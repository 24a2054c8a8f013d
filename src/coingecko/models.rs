//! CoinGecko API Data Models
//!
//! Response types for the CoinGecko v3 REST API.

use serde::Deserialize;
use std::collections::HashMap;

// ============================================================================
// Market chart
// ============================================================================

/// Response from `/coins/{id}/market_chart/range`
#[derive(Debug, Deserialize)]
pub struct MarketChartResponse {
    /// `[timestamp_ms, price]` pairs
    pub prices: Vec<(i64, f64)>,
}

// ============================================================================
// Coin history
// ============================================================================

/// Response from `/coins/{id}/history`
#[derive(Debug, Deserialize)]
pub struct CoinHistoryResponse {
    /// Absent for dates before the coin was listed
    #[serde(default)]
    pub market_data: Option<HistoryMarketData>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryMarketData {
    /// Price keyed by lowercase currency code
    pub current_price: HashMap<String, f64>,
}

/// Error body CoinGecko returns alongside non-200 statuses
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub status: Option<ErrorStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorStatus {
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ErrorResponse {
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or_else(|| self.status.as_ref().and_then(|s| s.error_message.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_market_chart() {
        let body = r#"{
            "prices": [[1730419200000, 69500.12], [1730422800000, 69610.5]],
            "market_caps": [[1730419200000, 1.37e12]],
            "total_volumes": []
        }"#;
        let parsed: MarketChartResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.prices.len(), 2);
        assert_eq!(parsed.prices[1], (1730422800000, 69610.5));
    }

    #[test]
    fn test_parse_history_without_market_data() {
        let parsed: CoinHistoryResponse =
            serde_json::from_str(r#"{"id": "bitcoin", "symbol": "btc"}"#).unwrap();
        assert!(parsed.market_data.is_none());
    }

    #[test]
    fn test_error_message() {
        let parsed: ErrorResponse = serde_json::from_str(
            r#"{"status": {"error_code": 429, "error_message": "rate limited"}}"#,
        )
        .unwrap();
        assert_eq!(parsed.message(), Some("rate limited"));
    }
}
