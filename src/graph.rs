//! Parser for the daily graph export (`date<TAB>views<TAB>joined`).

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::debug;

use crate::error::StatsError;
use crate::stats::StatsElem;

/// Day, abbreviated month name, year: `01 Jan 2024`.
pub const DATE_FORMAT: &str = "%d %b %Y";

const COLUMNS: usize = 3;

// Physical lines consumed before the csv reader starts.
const HEADER_LINES: u64 = 1;

/// Parses the export into daily records, in source order.
///
/// Exactly the first physical line is a header and is discarded, even when
/// blank; blank lines after it are skipped.
///
/// # Errors
///
/// [`StatsError::MalformedRecord`] for the first line with the wrong column
/// count or an unparsable date or number. Nothing is dropped silently.
pub fn parse_graph(text: &str) -> Result<Vec<StatsElem>, StatsError> {
    let body = text.split_once('\n').map_or("", |(_, rest)| rest);

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(body.as_bytes());

    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| StatsError::MalformedRecord {
            line: e.position().map(|p| p.line()).unwrap_or_default() + HEADER_LINES,
            content: String::new(),
            reason: e.to_string(),
        })?;
        rows.push(parse_record(&record)?);
    }

    debug!(days = rows.len(), "Graph export parsed");
    Ok(rows)
}

fn parse_record(record: &StringRecord) -> Result<StatsElem, StatsError> {
    let malformed = |reason: String| StatsError::MalformedRecord {
        line: record.position().map(|p| p.line()).unwrap_or_default() + HEADER_LINES,
        content: record.iter().collect::<Vec<_>>().join("\t"),
        reason,
    };

    if record.len() != COLUMNS {
        return Err(malformed(format!(
            "expected {COLUMNS} columns, found {}",
            record.len()
        )));
    }

    let date_field = record[0].trim();
    let date = NaiveDate::parse_from_str(date_field, DATE_FORMAT)
        .map_err(|e| malformed(format!("unparsable date `{date_field}`: {e}")))?;

    let count = |index: usize, name: &str| {
        let field = record[index].trim();
        field
            .parse::<u64>()
            .map_err(|e| malformed(format!("unparsable {name} `{field}`: {e}")))
    };

    Ok(StatsElem {
        date,
        views: count(1, "views")?,
        joined: count(2, "joined")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_days() {
        let rows = parse_graph("header\n01 Jan 2024\t100\t5\n02 Jan 2024\t200\t10\n").unwrap();

        assert_eq!(
            rows,
            vec![
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
            ]
        );
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(parse_graph("date\tviews\tjoined\n").unwrap().is_empty());
        assert!(parse_graph("").unwrap().is_empty());
    }

    #[test]
    fn test_blank_lines_are_not_records() {
        let rows = parse_graph("header\n01 Jan 2024\t1\t1\n\n\n").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_blank_first_line_is_the_header() {
        let rows = parse_graph("\n01 Jan 2024\t1\t1\n02 Jan 2024\t2\t2\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(rows[1].views, 2);
    }

    #[test]
    fn test_line_numbers_after_blank_header() {
        let err = parse_graph("\n01 Jan 2024\t1\t1\n\n02 Jan 2024\tx\t2\n").unwrap_err();
        match err {
            StatsError::MalformedRecord { line, .. } => assert_eq!(line, 4),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_without_newline_is_empty() {
        assert!(parse_graph("date\tviews\tjoined").unwrap().is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let rows = parse_graph("header\r\n01 Feb 2024\t7\t2\r\n").unwrap();
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(rows[0].views, 7);
    }

    #[test]
    fn test_order_is_preserved() {
        let rows = parse_graph("h\n03 Jan 2024\t3\t0\n01 Jan 2024\t1\t0\n").unwrap();
        assert_eq!(rows[0].views, 3);
        assert_eq!(rows[1].views, 1);
    }

    #[test]
    fn test_too_few_columns() {
        let err = parse_graph("header\n01 Jan 2024\t100\t5\n02 Jan 2024\t200\n").unwrap_err();
        match err {
            StatsError::MalformedRecord {
                line,
                content,
                reason,
            } => {
                assert_eq!(line, 3);
                assert_eq!(content, "02 Jan 2024\t200");
                assert!(reason.contains("found 2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_views() {
        let err = parse_graph("header\n01 Jan 2024\tabc\t5\n").unwrap_err();
        match err {
            StatsError::MalformedRecord { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("views"));
                assert!(reason.contains("abc"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_date() {
        let err = parse_graph("header\n2024-01-01\t1\t1\n").unwrap_err();
        assert!(err.to_string().contains("unparsable date"));
    }

    #[test]
    fn test_negative_joined_rejected() {
        let err = parse_graph("header\n01 Jan 2024\t1\t-1\n").unwrap_err();
        assert!(err.to_string().contains("joined"));
    }
}
