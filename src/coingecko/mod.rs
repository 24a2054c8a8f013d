//! CoinGecko API Integration
//!
//! Price history for the Monte Carlo run comes from the public CoinGecko
//! v3 REST API.
//!
//! # Components
//!
//! - [`client`] - HTTP client implementing [`PriceProvider`](crate::provider::PriceProvider)
//! - [`models`] - Response data types
//!
//! # Environment Variables
//!
//! - `COINGECKO_API_KEY` (optional) - Demo API key, sent as `x-cg-demo-api-key`
//!
//! # API Endpoints Used
//!
//! - `GET /coins/{id}/market_chart/range?vs_currency=...&from=...&to=...` - Historical prices
//! - `GET /coins/{id}/history?date=dd-mm-yyyy&localization=false` - Price on a date

pub mod client;
pub mod models;

pub use client::CoinGeckoClient;
