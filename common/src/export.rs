//! 結果のJSON/CSVエクスポート
//!
//! JSONは結果配列をそのまま整形出力、CSVは固定8列。ファイル名には
//! コロンをハイフンに置き換えたタイムスタンプを埋め込む。

use crate::error::Result;
use crate::types::ResultRecord;
use chrono::{DateTime, Utc};
use csv::{QuoteStyle, WriterBuilder};

/// CSVの固定ヘッダー行
pub const CSV_HEADERS: [&str; 8] = [
    "Iteration",
    "Operation",
    "Status",
    "API1 URL",
    "API2 URL",
    "API1 Duration (ms)",
    "API2 Duration (ms)",
    "Differences",
];

/// 結果配列を整形JSONにする
pub fn results_to_json(results: &[ResultRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

/// 結果配列をCSVにする
///
/// イテレーション番号は1始まり、differencesは`"; "`で連結、全セルを
/// クォートし内部のクォートは二重化する。
pub fn results_to_csv(results: &[ResultRecord]) -> Result<String> {
    let mut buffer = Vec::new();
    {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .from_writer(&mut buffer);

        writer.write_record(CSV_HEADERS)?;

        for (index, record) in results.iter().enumerate() {
            let api1 = record.api1.as_ref();
            let api2 = record.api2.as_ref();
            writer.write_record([
                (index + 1).to_string(),
                record.operation_name.clone(),
                record.status.as_str().to_string(),
                api1.and_then(|a| a.url.clone()).unwrap_or_default(),
                api2.and_then(|a| a.url.clone()).unwrap_or_default(),
                api1.and_then(|a| a.duration)
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                api2.and_then(|a| a.duration)
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                record
                    .differences
                    .as_deref()
                    .map(|d| d.join("; "))
                    .unwrap_or_default(),
            ])?;
        }

        writer.flush().map_err(csv::Error::from)?;
    }
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// エクスポートファイル名: `api-forge-results-YYYY-MM-DDTHH-mm-ss.<ext>`
pub fn export_file_name(extension: &str, now: DateTime<Utc>) -> String {
    format!(
        "api-forge-results-{}.{}",
        now.format("%Y-%m-%dT%H-%M-%S"),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(json: &str) -> ResultRecord {
        serde_json::from_str(json).expect("デシリアライズ失敗")
    }

    #[test]
    fn test_csv_differences_joined() {
        let results = [record(
            r#"{
                "operationName": "op",
                "status": "MISMATCH",
                "api1": {"url": "https://a.example.com", "duration": 12},
                "api2": {"url": "https://b.example.com", "duration": 34},
                "differences": ["a", "b"]
            }"#,
        )];
        let csv = results_to_csv(&results).expect("CSV生成失敗");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with(r#""1","op","MISMATCH""#));
        assert!(lines[1].ends_with(r#""a; b""#));
        assert!(lines[1].contains(r#""12""#));
        assert!(lines[1].contains(r#""34""#));
    }

    #[test]
    fn test_csv_quote_doubling() {
        let results = [record(
            r#"{
                "operationName": "say \"hi\"",
                "status": "MATCH"
            }"#,
        )];
        let csv = results_to_csv(&results).expect("CSV生成失敗");
        assert!(csv.contains(r#""say ""hi""""#));
    }

    #[test]
    fn test_csv_missing_sides_are_empty_cells() {
        let results = [record(r#"{"operationName": "op", "status": "ERROR"}"#)];
        let csv = results_to_csv(&results).expect("CSV生成失敗");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], r#""1","op","ERROR","","","","","""#);
    }

    #[test]
    fn test_csv_header_row() {
        let csv = results_to_csv(&[]).expect("CSV生成失敗");
        let header = csv.lines().next().expect("ヘッダー行がない");
        assert!(header.contains("Iteration"));
        assert!(header.contains("API1 Duration (ms)"));
        assert!(header.contains("Differences"));
    }

    #[test]
    fn test_json_export_is_pretty_array() {
        let results = [record(r#"{"operationName": "op", "status": "MATCH"}"#)];
        let json = results_to_json(&results).expect("JSON生成失敗");
        assert!(json.starts_with("[\n"));
        assert!(json.contains(r#""operationName": "op""#));
    }

    #[test]
    fn test_export_file_name_format() {
        let now = Utc.with_ymd_and_hms(2025, 11, 7, 9, 30, 5).unwrap();
        assert_eq!(
            export_file_name("csv", now),
            "api-forge-results-2025-11-07T09-30-05.csv"
        );
        assert_eq!(
            export_file_name("json", now),
            "api-forge-results-2025-11-07T09-30-05.json"
        );
    }
}
