//! Immutable message payloads flowing through topics

use chrono::{DateTime, Utc};

/// A single value published to a topic.
///
/// Carries three equivalent views of the same payload: raw bytes, a UTF-8
/// text view, and an opportunistic `f64` view. Parsing `text` as a double
/// never fails outright — unparseable text yields `f64::NAN`, which the
/// operator agents treat as "no value".
#[derive(Debug, Clone)]
pub struct Message {
    bytes: Vec<u8>,
    text: String,
    num: f64,
    created_at: DateTime<Utc>,
}

impl Message {
    /// Build a message from raw bytes, decoding lossily as UTF-8.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let num = parse_num(&text);
        Self {
            bytes,
            text,
            num,
            created_at: Utc::now(),
        }
    }

    /// Build a message from text.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let num = parse_num(&text);
        let bytes = text.clone().into_bytes();
        Self {
            bytes,
            text,
            num,
            created_at: Utc::now(),
        }
    }

    /// Build a message from a number, serializing it to canonical decimal
    /// text so that `.text()` and `.num()` round-trip.
    pub fn from_num(num: f64) -> Self {
        let text = format_num(num);
        let bytes = text.clone().into_bytes();
        Self {
            bytes,
            text,
            num,
            created_at: Utc::now(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn num(&self) -> f64 {
        self.num
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Parse text as `f64`, mapping "NaN"/"Infinity"/"-Infinity" and anything
/// else unparseable to NaN rather than returning a `Result`.
fn parse_num(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Canonical decimal rendering used so numbers round-trip through text.
fn format_num(num: f64) -> String {
    if num.is_nan() {
        "NaN".to_string()
    } else if num.is_infinite() {
        if num > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else {
        // Rust's default f64 Display is already the shortest round-tripping
        // decimal form (ryu-backed), matching Java's Double.toString intent.
        format!("{}", num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_num_round_trips_finite() {
        let m = Message::from_num(2.5);
        assert_eq!(m.num(), 2.5);
        assert_eq!(m.text(), "2.5");
    }

    #[test]
    fn from_num_round_trips_nan() {
        let m = Message::from_num(f64::NAN);
        assert!(m.num().is_nan());
        assert_eq!(m.text(), "NaN");
    }

    #[test]
    fn from_text_parses_nan_literal() {
        let m = Message::from_text("NaN");
        assert!(m.num().is_nan());
    }

    #[test]
    fn from_text_parses_infinity_literals() {
        let pos = Message::from_text("Infinity");
        assert_eq!(pos.num(), f64::INFINITY);
        let neg = Message::from_text("-Infinity");
        assert_eq!(neg.num(), f64::NEG_INFINITY);
    }

    #[test]
    fn from_text_non_numeric_yields_nan() {
        let m = Message::from_text("hello");
        assert!(m.num().is_nan());
    }

    #[test]
    fn from_bytes_decodes_utf8() {
        let m = Message::from_bytes(b"42".to_vec());
        assert_eq!(m.text(), "42");
        assert_eq!(m.num(), 42.0);
    }

    #[test]
    fn constructors_agree_on_round_trip() {
        let by_num = Message::from_num(7.0);
        let by_text = Message::from_text("7");
        assert_eq!(by_num.num(), by_text.num());
        assert_eq!(by_num.text(), by_text.text());
    }
}
