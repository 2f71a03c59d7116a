//! 比較リクエスト/レスポンスの型定義
//!
//! バックエンド(api/config, api/compare)とJSONで共有される型:
//! - RunConfig: 比較実行リクエスト
//! - ResultRecord: イテレーション毎の比較結果
//! - ConfigDocument: サーバ側の設定ドキュメント

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// テスト種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestType {
    #[default]
    Soap,
    Rest,
}

impl TestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestType::Soap => "SOAP",
            TestType::Rest => "REST",
        }
    }
}

/// 比較モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComparisonMode {
    #[default]
    Live,
    Baseline,
}

/// ベースライン操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BaselineOperation {
    #[default]
    Capture,
    Compare,
}

/// 比較結果ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResultStatus {
    Match,
    Mismatch,
    Error,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Match => "MATCH",
            ResultStatus::Mismatch => "MISMATCH",
            ResultStatus::Error => "ERROR",
        }
    }
}

/// ヘッダーテーブルの1行
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRow {
    pub name: String,
    pub value: String,
}

/// トークンテーブルの1行。valuesは`;`/`,`区切りの生文字列のまま保持し、
/// 分割はRunConfig構築時に行う
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRow {
    pub name: String,
    pub values: String,
}

/// 1オペレーションの定義
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Operation {
    pub name: String,
    pub methods: Vec<String>,
    pub headers: BTreeMap<String, String>,
    pub payload_template_path: Option<String>,
}

/// 片側エンドポイントの定義
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EndpointConfig {
    pub base_url: String,
    pub operations: Vec<Operation>,
}

/// API1/API2のペア
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointPair {
    pub api1: EndpointConfig,
    pub api2: EndpointConfig,
}

/// ベースライン操作の指定ブロック。CAPTUREはserviceName+description+tags、
/// COMPAREはserviceName+compareDate+compareRunIdを使う
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineBlock {
    pub operation: BaselineOperation,
    pub service_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_run_id: Option<String>,
}

/// 比較実行リクエスト。送信の度に新規構築し、リクエスト終了後は保持しない
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    pub test_type: TestType,
    pub max_iterations: u32,
    pub iteration_controller: String,
    pub tokens: BTreeMap<String, Vec<String>>,
    pub rest: EndpointPair,
    pub soap: EndpointPair,
    pub ignored_fields: Vec<String>,
    pub ignore_headers: bool,
    pub comparison_mode: ComparisonMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<BaselineBlock>,
}

/// 比較結果の片側(API1またはAPI2)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSide {
    pub url: Option<String>,
    pub request_payload: Option<String>,
    pub request_headers: Option<BTreeMap<String, String>>,
    pub response_payload: Option<String>,
    pub response_headers: Option<BTreeMap<String, String>>,
    pub duration: Option<u64>,
    pub status_code: Option<u32>,
}

/// 1イテレーション分の比較結果レコード
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    #[serde(default)]
    pub operation_name: String,
    pub status: ResultStatus,
    #[serde(default)]
    pub api1: Option<ApiSide>,
    #[serde(default)]
    pub api2: Option<ApiSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub differences: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration_tokens: Option<BTreeMap<String, String>>,
    /// ベースライン取得時刻。存在する場合はAPI2パネルを描画しない
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_capture_timestamp: Option<String>,
}

/// GET api/config のレスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigDocument {
    pub test_type: Option<TestType>,
    pub max_iterations: Option<u32>,
    pub iteration_controller: Option<String>,
    pub ignored_fields: Option<Vec<String>>,
    pub tokens: Option<BTreeMap<String, Vec<String>>>,
    pub rest: Option<EndpointPair>,
    pub soap: Option<EndpointPair>,
}

/// ベースライン実行のメタ情報(GET api/baselines/runs/{service}/{date})
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BaselineRunInfo {
    pub run_id: String,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub timestamp: Option<String>,
}

impl BaselineRunInfo {
    /// "run-001" 形式のIDから数値部分を取り出す。ソート用
    pub fn run_number(&self) -> u32 {
        self.run_id
            .trim_start_matches("run-")
            .parse()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_values() {
        assert_eq!(serde_json::to_string(&ResultStatus::Match).unwrap(), r#""MATCH""#);
        assert_eq!(serde_json::to_string(&ResultStatus::Mismatch).unwrap(), r#""MISMATCH""#);
        let s: ResultStatus = serde_json::from_str(r#""ERROR""#).expect("デシリアライズ失敗");
        assert_eq!(s, ResultStatus::Error);
    }

    #[test]
    fn test_test_type_wire_values() {
        assert_eq!(serde_json::to_string(&TestType::Soap).unwrap(), r#""SOAP""#);
        let t: TestType = serde_json::from_str(r#""REST""#).expect("デシリアライズ失敗");
        assert_eq!(t, TestType::Rest);
    }

    #[test]
    fn test_result_record_deserialize_minimal() {
        // バックエンドが省略したフィールドはデフォルト値で埋まること
        let json = r#"{"operationName": "getUser", "status": "MATCH"}"#;
        let record: ResultRecord = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(record.operation_name, "getUser");
        assert_eq!(record.status, ResultStatus::Match);
        assert!(record.api1.is_none());
        assert!(record.differences.is_none());
    }

    #[test]
    fn test_result_record_deserialize_full() {
        let json = r#"{
            "operationName": "getUser",
            "status": "MISMATCH",
            "api1": {"url": "https://a.example.com", "duration": 120, "statusCode": 200},
            "api2": {"url": "https://b.example.com", "duration": 340},
            "differences": ["field 'id' differs"],
            "iterationTokens": {"id": "42"}
        }"#;
        let record: ResultRecord = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(record.api1.as_ref().unwrap().duration, Some(120));
        assert_eq!(record.api2.as_ref().unwrap().url.as_deref(), Some("https://b.example.com"));
        assert_eq!(record.differences.as_ref().unwrap().len(), 1);
        assert_eq!(record.iteration_tokens.as_ref().unwrap()["id"], "42");
    }

    #[test]
    fn test_baseline_block_capture_serialize() {
        let block = BaselineBlock {
            operation: BaselineOperation::Capture,
            service_name: "userService".to_string(),
            description: Some("初回取得".to_string()),
            tags: Some(vec!["v1".to_string()]),
            compare_date: None,
            compare_run_id: None,
        };
        let json = serde_json::to_string(&block).expect("シリアライズ失敗");
        assert!(json.contains(r#""operation":"CAPTURE""#));
        assert!(json.contains(r#""serviceName":"userService""#));
        // COMPARE専用フィールドは出力されないこと
        assert!(!json.contains("compareDate"));
    }

    #[test]
    fn test_run_number_sort_key() {
        let run = BaselineRunInfo {
            run_id: "run-012".to_string(),
            ..Default::default()
        };
        assert_eq!(run.run_number(), 12);
        let odd = BaselineRunInfo {
            run_id: "broken".to_string(),
            ..Default::default()
        };
        assert_eq!(odd.run_number(), 0);
    }
}
