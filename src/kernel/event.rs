use std::fmt;

use serde::{Deserialize, Serialize};

/// One metric reading. Handed to the log sink immediately, never retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub metric: String,
    pub value: MetricValue,
    pub timestamp_ms: u64,
}

impl Sample {
    pub fn new(metric: &str, value: MetricValue, timestamp_ms: u64) -> Self {
        Self {
            metric: metric.to_string(),
            value,
            timestamp_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    /// The source answered, but there was nothing to report.
    Missing,
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{:.1}", n),
            MetricValue::Text(s) => f.write_str(s),
            MetricValue::Missing => f.write_str("none"),
        }
    }
}
