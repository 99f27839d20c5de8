use crate::venue::VenueKind;
use fill_cost_core::{OrderBookSnapshot, RawLevel};
use serde::Deserialize;

// Levels arrive as `[price, quantity, ..]`; extra trailing entries are ignored.
type RawEntry = Vec<serde_json::Value>;

#[derive(Deserialize, Debug)]
struct RawBook {
    #[serde(default)]
    asks: Option<Vec<RawEntry>>,
    #[serde(default)]
    bids: Option<Vec<RawEntry>>,
}

/// `GET /api/v2/orderbook`: `{"data": {"bids": .., "asks": ..}, "success": true, ..}`
#[derive(Deserialize, Debug)]
struct BtcturkOrderBook {
    #[serde(default)]
    data: Option<RawBook>,
    #[serde(default)]
    message: Option<String>,
}

/// Error body some venues return with a non-success status.
#[derive(Deserialize, Debug)]
pub(crate) struct ApiErrorResponse {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default, alias = "message")]
    pub msg: Option<String>,
}

fn level_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn convert(side: &str, levels: Option<Vec<RawEntry>>) -> Result<Option<Vec<RawLevel>>, String> {
    let Some(levels) = levels else {
        return Ok(None);
    };
    levels
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry.as_slice() {
            [price, quantity, ..] => level_text(price)
                .zip(level_text(quantity))
                .ok_or_else(|| format!("{side} level {index} is not a pair of numbers")),
            _ => Err(format!("{side} level {index} has fewer than two values")),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Decodes a successful order book body. The error string explains why the
/// body is not a usable book: malformed JSON, or neither asks nor bids.
pub(crate) fn parse_order_book(kind: VenueKind, body: &str) -> Result<OrderBookSnapshot, String> {
    let book = match kind {
        // `{"lastUpdateId": .., "bids": [[p, q]], "asks": [[p, q]]}`
        VenueKind::Binance => serde_json::from_str::<RawBook>(body)
            .map_err(|e| format!("malformed response: {e}"))?,
        VenueKind::Btcturk => {
            let response = serde_json::from_str::<BtcturkOrderBook>(body)
                .map_err(|e| format!("malformed response: {e}"))?;
            match response.data {
                Some(book) => book,
                None => {
                    return Err(format!(
                        "response has no order book data{}",
                        response
                            .message
                            .map(|m| format!(" ({m})"))
                            .unwrap_or_default()
                    ))
                }
            }
        }
    };

    if book.asks.is_none() && book.bids.is_none() {
        return Err("response has neither asks nor bids".to_string());
    }
    Ok(OrderBookSnapshot {
        asks: convert("ask", book.asks)?,
        bids: convert("bid", book.bids)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(price: &str, quantity: &str) -> RawLevel {
        (price.to_string(), quantity.to_string())
    }

    #[test]
    fn binance_depth_body() {
        let body = r#"{
            "lastUpdateId": 1027024,
            "bids": [["85813.58000000", "0.43100000"]],
            "asks": [["85813.59000000", "0.05105000"], ["85814.00000000", "0.02500000"]]
        }"#;
        let book = parse_order_book(VenueKind::Binance, body).unwrap();
        assert_eq!(
            book.asks.unwrap(),
            vec![pair("85813.59000000", "0.05105000"), pair("85814.00000000", "0.02500000")]
        );
        assert_eq!(book.bids.unwrap(), vec![pair("85813.58000000", "0.43100000")]);
    }

    #[test]
    fn btcturk_body_with_numbers() {
        let body = r#"{
            "data": {
                "timestamp": 1700000000000.0,
                "bids": [["85750", "0.1"]],
                "asks": [[85757, 0.0233], ["85758", "0.02330"]]
            },
            "success": true,
            "message": null,
            "code": 0
        }"#;
        let book = parse_order_book(VenueKind::Btcturk, body).unwrap();
        assert_eq!(
            book.asks.unwrap(),
            vec![pair("85757", "0.0233"), pair("85758", "0.02330")]
        );
    }

    #[test]
    fn one_side_missing_is_accepted() {
        let book = parse_order_book(VenueKind::Binance, r#"{"asks": [["1", "2"]]}"#).unwrap();
        assert_eq!(book.asks.unwrap(), vec![pair("1", "2")]);
        assert!(book.bids.is_none());
    }

    #[test]
    fn both_sides_missing_is_rejected() {
        let err = parse_order_book(VenueKind::Binance, r#"{"lastUpdateId": 1}"#).unwrap_err();
        assert_eq!(err, "response has neither asks nor bids");

        let err = parse_order_book(VenueKind::Btcturk, r#"{"data": {"timestamp": 1}}"#).unwrap_err();
        assert_eq!(err, "response has neither asks nor bids");
    }

    #[test]
    fn btcturk_without_data_reports_message() {
        let body = r#"{"data": null, "success": false, "message": "pair not found", "code": 1}"#;
        let err = parse_order_book(VenueKind::Btcturk, body).unwrap_err();
        assert_eq!(err, "response has no order book data (pair not found)");
    }

    #[test]
    fn short_or_non_numeric_levels_are_rejected() {
        let err = parse_order_book(VenueKind::Binance, r#"{"asks": [["1"]]}"#).unwrap_err();
        assert_eq!(err, "ask level 0 has fewer than two values");
        let err = parse_order_book(VenueKind::Binance, r#"{"bids": [["1", "2"], [null, "2"]]}"#)
            .unwrap_err();
        assert_eq!(err, "bid level 1 is not a pair of numbers");
    }

    #[test]
    fn trailing_level_fields_are_ignored() {
        let book = parse_order_book(VenueKind::Binance, r#"{"asks": [["1", "2", 3]]}"#).unwrap();
        assert_eq!(book.asks.unwrap(), vec![pair("1", "2")]);
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = parse_order_book(VenueKind::Binance, "<html>").unwrap_err();
        assert!(err.starts_with("malformed response"));
    }

    #[test]
    fn api_error_body() {
        let err: ApiErrorResponse =
            serde_json::from_str(r#"{"code": -1121, "msg": "Invalid symbol."}"#).unwrap();
        assert_eq!(err.code, Some(-1121));
        assert_eq!(err.msg.as_deref(), Some("Invalid symbol."));

        let err: ApiErrorResponse =
            serde_json::from_str(r#"{"success": false, "message": "Too many requests"}"#).unwrap();
        assert_eq!(err.msg.as_deref(), Some("Too many requests"));
    }
}
