//! 結果のフィルタ/検索
//!
//! 直近に描画した結果集合に対するクライアント側の絞り込み。行が可視なのは
//! ステータスフィルタに一致し、かつ検索語が空か行のテキストに含まれる
//! (大文字小文字を無視した部分一致)場合のみ。

use crate::types::{ApiSide, ResultRecord, ResultStatus};

/// ステータスフィルタ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Match,
    Mismatch,
    Error,
}

impl StatusFilter {
    pub fn matches(&self, status: ResultStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Match => status == ResultStatus::Match,
            StatusFilter::Mismatch => status == ResultStatus::Mismatch,
            StatusFilter::Error => status == ResultStatus::Error,
        }
    }
}

fn push_side(buf: &mut String, side: &ApiSide) {
    if let Some(url) = &side.url {
        buf.push_str(url);
        buf.push('\n');
    }
    for headers in [&side.request_headers, &side.response_headers].into_iter().flatten() {
        for (name, value) in headers {
            buf.push_str(name);
            buf.push_str(": ");
            buf.push_str(value);
            buf.push('\n');
        }
    }
    for payload in [&side.request_payload, &side.response_payload].into_iter().flatten() {
        buf.push_str(payload);
        buf.push('\n');
    }
    if let Some(duration) = side.duration {
        buf.push_str(&duration.to_string());
        buf.push('\n');
    }
    if let Some(code) = side.status_code {
        buf.push_str(&code.to_string());
        buf.push('\n');
    }
}

/// 行の描画テキストに相当する検索対象文字列を組み立てる(小文字化済み)
pub fn search_haystack(record: &ResultRecord) -> String {
    let mut buf = String::new();
    buf.push_str(&record.operation_name);
    buf.push('\n');
    buf.push_str(record.status.as_str());
    buf.push('\n');
    for side in [&record.api1, &record.api2].into_iter().flatten() {
        push_side(&mut buf, side);
    }
    if let Some(differences) = &record.differences {
        for diff in differences {
            buf.push_str(diff);
            buf.push('\n');
        }
    }
    if let Some(tokens) = &record.iteration_tokens {
        for (name, value) in tokens {
            buf.push_str(name);
            buf.push('=');
            buf.push_str(value);
            buf.push('\n');
        }
    }
    if let Some(message) = &record.error_message {
        buf.push_str(message);
        buf.push('\n');
    }
    buf.to_lowercase()
}

/// 行の可視判定。haystackは`search_haystack`の出力(小文字)を渡す
pub fn is_visible(filter: StatusFilter, term: &str, status: ResultStatus, haystack: &str) -> bool {
    if !filter.matches(status) {
        return false;
    }
    let term = term.trim().to_lowercase();
    term.is_empty() || haystack.contains(&term)
}

/// 可視行数を数える。0かつ結果が非空なら「該当なし」表示になる
pub fn visible_count<'a, I>(filter: StatusFilter, term: &str, rows: I) -> usize
where
    I: IntoIterator<Item = (ResultStatus, &'a str)>,
{
    rows.into_iter()
        .filter(|(status, haystack)| is_visible(filter, term, *status, haystack))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: ResultStatus, operation: &str) -> ResultRecord {
        serde_json::from_str(&format!(
            r#"{{"operationName": "{}", "status": "{}"}}"#,
            operation,
            status.as_str()
        ))
        .expect("デシリアライズ失敗")
    }

    #[test]
    fn test_status_filter_exact_match() {
        let records = [
            record(ResultStatus::Match, "a"),
            record(ResultStatus::Mismatch, "b"),
            record(ResultStatus::Error, "c"),
        ];
        let rows: Vec<(ResultStatus, String)> = records
            .iter()
            .map(|r| (r.status, search_haystack(r)))
            .collect();

        let visible: Vec<bool> = rows
            .iter()
            .map(|(s, h)| is_visible(StatusFilter::Mismatch, "", *s, h))
            .collect();
        assert_eq!(visible, vec![false, true, false]);

        // 検索語があってもステータスフィルタは常に効く
        let visible: Vec<bool> = rows
            .iter()
            .map(|(s, h)| is_visible(StatusFilter::Mismatch, "a", *s, h))
            .collect();
        assert_eq!(visible, vec![false, false, false]);
    }

    #[test]
    fn test_search_case_insensitive_substring() {
        let r = record(ResultStatus::Match, "GetUserProfile");
        let haystack = search_haystack(&r);
        assert!(is_visible(StatusFilter::All, "userpro", r.status, &haystack));
        assert!(is_visible(StatusFilter::All, "  USERPRO  ", r.status, &haystack));
        assert!(!is_visible(StatusFilter::All, "absent", r.status, &haystack));
    }

    #[test]
    fn test_haystack_covers_payloads_and_differences() {
        let r: ResultRecord = serde_json::from_str(
            r#"{
                "operationName": "op",
                "status": "MISMATCH",
                "api1": {"url": "https://a.example.com", "responsePayload": "{\"city\":\"Osaka\"}"},
                "differences": ["field 'total' differs"],
                "iterationTokens": {"id": "42"}
            }"#,
        )
        .expect("デシリアライズ失敗");
        let haystack = search_haystack(&r);
        assert!(haystack.contains("osaka"));
        assert!(haystack.contains("field 'total' differs"));
        assert!(haystack.contains("id=42"));
        assert!(haystack.contains("a.example.com"));
    }

    #[test]
    fn test_visible_count_zero_triggers_placeholder() {
        let records = [
            record(ResultStatus::Match, "alpha"),
            record(ResultStatus::Mismatch, "beta"),
        ];
        let rows: Vec<(ResultStatus, String)> = records
            .iter()
            .map(|r| (r.status, search_haystack(r)))
            .collect();

        let count = visible_count(
            StatusFilter::Mismatch,
            "alpha",
            rows.iter().map(|(s, h)| (*s, h.as_str())),
        );
        assert_eq!(count, 0);

        let count = visible_count(
            StatusFilter::All,
            "",
            rows.iter().map(|(s, h)| (*s, h.as_str())),
        );
        assert_eq!(count, 2);
    }
}
