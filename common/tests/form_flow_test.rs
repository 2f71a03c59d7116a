//! フォーム→リクエスト構築フローのテスト
//!
//! 送信前の検証とRunConfigのワイヤ形式を検証する

use api_forge_common::{
    baseline_block, build_config, BaselineOperation, CacheDecision, CacheSnapshot, ComparisonMode,
    Error, FormState, HeaderRow, TestType, TokenRow,
};
use chrono::{TimeZone, Utc};

/// LIVEモードでURLが両方空なら送信前に中断される
#[test]
fn test_live_mode_without_urls_aborts_before_network() {
    let form = FormState {
        comparison_mode: ComparisonMode::Live,
        ..Default::default()
    };
    let err = build_config(&form).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

/// CAPTUREはサービス名必須、COMPAREは3項目すべて必須
#[test]
fn test_baseline_validation_aborts_before_network() {
    let mut form = FormState {
        url1: "https://api1.example.com/rest".to_string(),
        comparison_mode: ComparisonMode::Baseline,
        baseline_operation: BaselineOperation::Capture,
        ..Default::default()
    };
    assert!(baseline_block(&form).is_err());

    form.baseline_operation = BaselineOperation::Compare;
    form.baseline_service = "userService".to_string();
    form.baseline_date = "2025-11-01".to_string();
    assert!(baseline_block(&form).is_err());

    form.baseline_run = "run-001".to_string();
    assert!(baseline_block(&form).is_ok());
}

/// 構築したRunConfigがバックエンドの期待するJSONキーを持つ
#[test]
fn test_run_config_wire_shape() {
    let mut form = FormState {
        test_type: TestType::Rest,
        url1: "https://api1.example.com/rest".to_string(),
        url2: "https://api2.example.com/rest".to_string(),
        operation_name: "getUser".to_string(),
        payload: r#"{"id": "{{id}}"}"#.to_string(),
        ..Default::default()
    };
    form.headers.push(HeaderRow {
        name: "Content-Type".to_string(),
        value: "application/json".to_string(),
    });
    form.tokens.push(TokenRow {
        name: "id".to_string(),
        values: "1; 2".to_string(),
    });

    let config = build_config(&form).expect("構築失敗");
    let json = serde_json::to_string(&config).expect("シリアライズ失敗");

    assert!(json.contains(r#""testType":"REST""#));
    assert!(json.contains(r#""maxIterations":100"#));
    assert!(json.contains(r#""iterationController":"ONE_BY_ONE""#));
    assert!(json.contains(r#""comparisonMode":"LIVE""#));
    assert!(json.contains(r#""baseUrl":"https://api1.example.com/rest""#));
    assert!(json.contains(r#""payloadTemplatePath":"{\"id\": \"{{id}}\"}""#));
    assert!(json.contains(r#""id":["1","2"]"#));
    // LIVEモードではbaselineキー自体を出力しない
    assert!(!json.contains(r#""baseline""#));
}

/// キャッシュ保存→復元でフォーム内容が往復する
#[test]
fn test_cache_roundtrip_through_form_state() {
    let now = Utc.with_ymd_and_hms(2025, 11, 10, 9, 0, 0).unwrap();

    let mut form = FormState {
        test_type: TestType::Rest,
        url1: "https://api1.example.com/rest".to_string(),
        operation_name: "getUser".to_string(),
        max_iterations: "25".to_string(),
        ..Default::default()
    };
    form.tokens.push(TokenRow {
        name: "id".to_string(),
        values: "1, 2".to_string(),
    });

    let raw = api_forge_common::cache::encode(&CacheSnapshot::from_form(&form, now))
        .expect("保存失敗");

    let CacheDecision::Apply(snapshot) =
        api_forge_common::cache::decode(&raw, now).expect("読込失敗")
    else {
        panic!("新しいキャッシュは適用されるべき");
    };

    let mut restored = FormState::default();
    snapshot.apply(&mut restored);
    assert_eq!(restored.test_type, TestType::Rest);
    assert_eq!(restored.url1, form.url1);
    assert_eq!(restored.operation_name, "getUser");
    assert_eq!(restored.max_iterations, "25");
    assert_eq!(restored.tokens, form.tokens);
}
