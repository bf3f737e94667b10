use serde::{Deserialize, Serialize};

/// Point-in-time view of a manager's state and counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairlistStatistics {
    pub pair_count: usize,
    pub filter_count: usize,
    pub refresh_count: u64,
    pub total_filter_executions: u64,
    /// RFC 3339, UTC.
    pub last_refresh_time: String,
    pub auto_refresh_running: bool,
    /// Seconds.
    pub refresh_interval: u64,
    pub filters: Vec<String>,
}

impl PairlistStatistics {
    pub fn to_json(&self) -> serde_json::Value {
        // Plain fields only, serialization cannot fail.
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_expected_field_names() {
        let stats = PairlistStatistics {
            pair_count: 2,
            filter_count: 1,
            refresh_count: 3,
            total_filter_executions: 3,
            last_refresh_time: "2024-01-01T00:00:00+00:00".into(),
            auto_refresh_running: false,
            refresh_interval: 1800,
            filters: vec!["VolumePairList".into()],
        };
        let json = stats.to_json();
        assert_eq!(json["pair_count"], 2);
        assert_eq!(json["refresh_interval"], 1800);
        assert_eq!(json["filters"][0], "VolumePairList");
        assert_eq!(json["auto_refresh_running"], false);
    }
}
