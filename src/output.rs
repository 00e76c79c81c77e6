//! Rendering of collected statistics.
//!
//! JSON for the full record, CSV for the daily series.

use anyhow::Result;
use csv::WriterBuilder;
use tracing::debug;

use crate::stats::{Statistics, StatsElem};

/// Renders statistics as pretty-printed JSON.
pub fn render_json(stats: &Statistics) -> Result<String> {
    Ok(serde_json::to_string_pretty(stats)?)
}

/// Writes the daily series to `path` as CSV with a `date,views,joined` header,
/// replacing any existing file.
pub fn write_graph_csv(path: &str, days: &[StatsElem]) -> Result<()> {
    debug!(path, days = days.len(), "Writing graph CSV");

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for day in days {
        writer.serialize(day)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::HeaderStats;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample() -> Statistics {
        let header = HeaderStats {
            tg_link: "https://t.me/example".to_string(),
            status: "Active".to_string(),
            cpm: Decimal::new(2, 0),
            total_views: "300".to_string(),
        };
        let days = vec![
            StatsElem {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                views: 100,
                joined: 5,
            },
            StatsElem {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                views: 200,
                joined: 10,
            },
        ];
        Statistics::compute("c1", header, days).unwrap()
    }

    #[test]
    fn test_render_json_contains_fields() {
        let json = render_json(&sample()).unwrap();
        assert!(json.contains("\"tg_link\": \"https://t.me/example\""));
        assert!(json.contains("\"total_joined\": 15"));
        assert!(json.contains("\"graph_stats\""));
    }

    #[test]
    fn test_write_graph_csv() {
        let path = temp_path("promote_stats_test_graph.csv");
        let _ = fs::remove_file(&path);

        write_graph_csv(&path, sample().graph_stats()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec!["date,views,joined", "2024-01-01,100,5", "2024-01-02,200,10"]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_graph_csv_replaces_file() {
        let path = temp_path("promote_stats_test_replace.csv");
        let stats = sample();

        write_graph_csv(&path, stats.graph_stats()).unwrap();
        write_graph_csv(&path, &stats.graph_stats()[..1]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);

        fs::remove_file(&path).unwrap();
    }
}
