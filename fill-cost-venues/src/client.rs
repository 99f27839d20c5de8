use crate::error::VenueConfigError;
use crate::responses::{parse_order_book, ApiErrorResponse};
use crate::venue::{SourceSettings, VenueConfig};
use async_trait::async_trait;
use fill_cost_core::{OrderBookSnapshot, OrderBookSource, SourceError, VenueId};
use std::collections::HashMap;
use tracing::debug;
use validator::Validate;

/// Longest slice of an error body quoted back in a fetch error.
const ERROR_BODY_LIMIT: usize = 200;

/// Reads order books from exchange REST APIs.
///
/// Every request is bounded by the configured timeout. Transport failures and
/// non-success statuses surface as [`SourceError::Fetch`] with the cause
/// attached; bodies that are not an order book surface as
/// [`SourceError::Validation`].
#[derive(Debug, Clone)]
pub struct HttpOrderBookSource {
    client: reqwest::Client,
    venues: HashMap<VenueId, VenueConfig>,
}

impl HttpOrderBookSource {
    pub fn new(settings: &SourceSettings) -> Result<Self, VenueConfigError> {
        settings.validate()?;

        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .user_agent(concat!("fill-cost/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(VenueConfigError::Client)?;

        let mut venues = HashMap::with_capacity(settings.venues.len());
        for config in &settings.venues {
            let id = config.venue_id();
            if venues.insert(id.clone(), config.clone()).is_some() {
                return Err(VenueConfigError::DuplicateVenue(id));
            }
        }
        Ok(HttpOrderBookSource { client, venues })
    }

    /// Configured venues, sorted by id.
    pub fn venue_ids(&self) -> Vec<VenueId> {
        let mut ids: Vec<VenueId> = self.venues.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn url(config: &VenueConfig) -> String {
        let (path, _) = config.kind.endpoint();
        format!("{}{}", config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl OrderBookSource for HttpOrderBookSource {
    async fn fetch(
        &self,
        venue: &VenueId,
        symbol: &str,
        depth: u32,
    ) -> Result<OrderBookSnapshot, SourceError> {
        let config = self
            .venues
            .get(venue)
            .ok_or_else(|| SourceError::UnknownVenue(venue.clone()))?;
        let symbol = config.symbol.as_deref().unwrap_or(symbol);
        let (_, symbol_param) = config.kind.endpoint();
        let url = Self::url(config);
        debug!(%venue, %url, symbol, depth, "requesting order book");

        let response = self
            .client
            .get(&url)
            .query(&[(symbol_param, symbol.to_string()), ("limit", depth.to_string())])
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    "request timed out"
                } else {
                    "request failed"
                };
                SourceError::fetch(venue.clone(), message, e)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::fetch(venue.clone(), "failed to read response body", e))?;

        if !status.is_success() {
            let detail = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(ApiErrorResponse { code, msg: Some(msg) }) => match code {
                    Some(code) => format!("{msg} (code {code})"),
                    None => msg,
                },
                _ => body.chars().take(ERROR_BODY_LIMIT).collect(),
            };
            return Err(SourceError::Fetch {
                venue: venue.clone(),
                message: format!("HTTP {status}: {detail}"),
                source: None,
            });
        }

        parse_order_book(config.kind, &body).map_err(|reason| SourceError::validation(venue.clone(), reason))
    }
}
