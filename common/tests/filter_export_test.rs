//! フィルタとエクスポートのシナリオテスト

use api_forge_common::{
    is_visible, results_to_csv, search_haystack, visible_count, ResultRecord, ResultStatus,
    StatusFilter,
};

fn sample_results() -> Vec<ResultRecord> {
    serde_json::from_str(
        r#"[
            {"operationName": "getUser", "status": "MATCH",
             "api1": {"url": "https://a.example.com/users", "duration": 110},
             "api2": {"url": "https://b.example.com/users", "duration": 95}},
            {"operationName": "getOrder", "status": "MISMATCH",
             "api1": {"url": "https://a.example.com/orders", "duration": 210},
             "api2": {"url": "https://b.example.com/orders", "duration": 180},
             "differences": ["field 'total' differs", "field \"status\" differs"]},
            {"operationName": "getStock", "status": "ERROR",
             "errorMessage": "connection refused"}
        ]"#,
    )
    .expect("デシリアライズ失敗")
}

/// mismatchフィルタは検索語に関わらずMISMATCH行だけを残す
#[test]
fn test_mismatch_filter_matrix() {
    let results = sample_results();
    let rows: Vec<(ResultStatus, String)> = results
        .iter()
        .map(|r| (r.status, search_haystack(r)))
        .collect();

    let visible: Vec<bool> = rows
        .iter()
        .map(|(s, h)| is_visible(StatusFilter::Mismatch, "", *s, h))
        .collect();
    assert_eq!(visible, vec![false, true, false]);

    // 検索語がMISMATCH行にも当たらない → 可視0件で「該当なし」表示
    let count = visible_count(
        StatusFilter::Mismatch,
        "getUser",
        rows.iter().map(|(s, h)| (*s, h.as_str())),
    );
    assert_eq!(count, 0);

    // 検索語がMISMATCH行に当たる
    let count = visible_count(
        StatusFilter::Mismatch,
        "ORDERS",
        rows.iter().map(|(s, h)| (*s, h.as_str())),
    );
    assert_eq!(count, 1);
}

/// CSVの列構成・引用・差分連結を1ファイル分まとめて検証する
#[test]
fn test_csv_export_scenario() {
    let results = sample_results();
    let csv = results_to_csv(&results).expect("CSV生成失敗");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);

    assert!(lines[0].contains("Iteration"));
    assert!(lines[1].starts_with(r#""1","getUser","MATCH""#));
    assert!(lines[2].contains(r#""field 'total' differs; field ""status"" differs""#));
    // エラー行はURL/所要時間セルが空
    assert_eq!(lines[3], r#""3","getStock","ERROR","","","","","""#);
}
