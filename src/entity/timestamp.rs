//! Timestamps rendered with the configured layout.

use std::fmt::Write;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// A point in time paired with the strftime layout used to render it.
///
/// An empty or unparseable layout falls back to RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    pub time: DateTime<Utc>,
    pub format: Arc<str>,
}

impl Timestamp {
    pub fn new(time: DateTime<Utc>, format: Arc<str>) -> Self {
        Self { time, format }
    }

    /// Render using the layout.
    pub fn render(&self) -> String {
        if self.format.is_empty() {
            return self.time.to_rfc3339();
        }
        let mut out = String::new();
        match write!(out, "{}", self.time.format(&self.format)) {
            Ok(()) => out,
            Err(_) => self.time.to_rfc3339(),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap()
    }

    #[test]
    fn test_empty_layout_is_rfc3339() {
        let ts = Timestamp::new(at(), Arc::from(""));
        assert_eq!(ts.render(), "2024-03-09T14:05:00+00:00");
    }

    #[test]
    fn test_custom_layout() {
        let ts = Timestamp::new(at(), Arc::from("%Y/%m/%d %H:%M"));
        assert_eq!(ts.render(), "2024/03/09 14:05");
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"2024/03/09 14:05\"");
    }

    #[test]
    fn test_invalid_layout_falls_back() {
        let ts = Timestamp::new(at(), Arc::from("%Q"));
        assert_eq!(ts.render(), "2024-03-09T14:05:00+00:00");
    }
}
