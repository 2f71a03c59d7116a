//! フォーム状態(ビューモデル)とRunConfigの構築
//!
//! DOMから切り離した単一のビューモデルとして全フォーム項目を保持する。
//! 構築・検証はすべて純関数で、WASM側はシグナルの読み書きに徹する。

use crate::error::{Error, Result};
use crate::types::{
    BaselineBlock, BaselineOperation, ComparisonMode, ConfigDocument, EndpointConfig,
    EndpointPair, HeaderRow, Operation, RunConfig, TestType, TokenRow,
};
use std::collections::BTreeMap;

/// 許可するHTTPメソッド。これ以外はPOSTに正規化する
pub const METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "PATCH"];

/// maxIterationsが解析不能なときのデフォルト
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// フォーム全項目のビューモデル
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub test_type: TestType,
    pub operation_name: String,
    pub url1: String,
    pub url2: String,
    pub method: String,
    pub payload: String,
    pub ignored_fields: String,
    pub ignore_headers: bool,
    pub max_iterations: String,
    pub iteration_controller: String,
    pub enable_auth: bool,
    pub client_id: String,
    pub client_secret: String,
    pub headers: Vec<HeaderRow>,
    pub tokens: Vec<TokenRow>,
    pub comparison_mode: ComparisonMode,
    pub baseline_operation: BaselineOperation,
    pub baseline_service_name: String,
    pub baseline_description: String,
    pub baseline_tags: String,
    pub baseline_service: String,
    pub baseline_date: String,
    pub baseline_run: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            test_type: TestType::default(),
            operation_name: String::new(),
            url1: String::new(),
            url2: String::new(),
            method: "POST".to_string(),
            payload: String::new(),
            ignored_fields: "timestamp".to_string(),
            ignore_headers: false,
            max_iterations: "100".to_string(),
            iteration_controller: "ONE_BY_ONE".to_string(),
            enable_auth: false,
            client_id: String::new(),
            client_secret: String::new(),
            headers: Vec::new(),
            tokens: Vec::new(),
            comparison_mode: ComparisonMode::default(),
            baseline_operation: BaselineOperation::default(),
            baseline_service_name: String::new(),
            baseline_description: String::new(),
            baseline_tags: String::new(),
            baseline_service: String::new(),
            baseline_date: String::new(),
            baseline_run: String::new(),
        }
    }
}

/// トークン値文字列を`;`/`,`で分割してトリムし、空要素を除く
pub fn split_token_values(raw: &str) -> Vec<String> {
    raw.split([';', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn header_map(rows: &[HeaderRow]) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for row in rows {
        let name = row.name.trim();
        if !name.is_empty() {
            map.insert(name.to_string(), row.value.trim().to_string());
        }
    }
    map
}

fn token_map(rows: &[TokenRow]) -> BTreeMap<String, Vec<String>> {
    let mut map = BTreeMap::new();
    for row in rows {
        let name = row.name.trim();
        if !name.is_empty() {
            map.insert(name.to_string(), split_token_values(&row.values));
        }
    }
    map
}

/// フォーム状態からRunConfigを構築する
///
/// 検証はベースURLが1つ以上あることのみ。名前が空のヘッダー/トークン行は
/// 除外し、maxIterationsが解析不能なら100、ペイロードが空ならnullになる。
pub fn build_config(form: &FormState) -> Result<RunConfig> {
    if form.url1.trim().is_empty() && form.url2.trim().is_empty() {
        return Err(Error::Validation(
            "ベースURLを少なくとも1つ入力してください".to_string(),
        ));
    }

    let method = if METHODS.contains(&form.method.as_str()) {
        form.method.clone()
    } else {
        "POST".to_string()
    };

    let operation_name = if form.operation_name.is_empty() {
        "operation".to_string()
    } else {
        form.operation_name.clone()
    };

    let operation = Operation {
        name: operation_name,
        methods: vec![method],
        headers: header_map(&form.headers),
        payload_template_path: if form.payload.is_empty() {
            None
        } else {
            Some(form.payload.clone())
        },
    };

    // バックエンドはtestTypeで参照先を選ぶため、同じ内容をrest/soap両方に置く
    let pair = EndpointPair {
        api1: EndpointConfig {
            base_url: form.url1.clone(),
            operations: vec![operation.clone()],
        },
        api2: EndpointConfig {
            base_url: form.url2.clone(),
            operations: vec![operation],
        },
    };

    Ok(RunConfig {
        test_type: form.test_type,
        max_iterations: form
            .max_iterations
            .trim()
            .parse()
            .unwrap_or(DEFAULT_MAX_ITERATIONS),
        iteration_controller: form.iteration_controller.clone(),
        tokens: token_map(&form.tokens),
        rest: pair.clone(),
        soap: pair,
        ignored_fields: form
            .ignored_fields
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        ignore_headers: form.ignore_headers,
        comparison_mode: form.comparison_mode,
        baseline: None,
    })
}

/// BASELINEモード時のbaselineブロックを構築する
///
/// CAPTUREはサービス名必須、COMPAREはサービス・日付・実行IDすべて必須。
pub fn baseline_block(form: &FormState) -> Result<BaselineBlock> {
    match form.baseline_operation {
        BaselineOperation::Capture => {
            let service = form.baseline_service_name.trim();
            if service.is_empty() {
                return Err(Error::Validation(
                    "ベースライン取得にはサービス名が必要です".to_string(),
                ));
            }
            let description = form.baseline_description.trim();
            let tags: Vec<String> = form
                .baseline_tags
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            Ok(BaselineBlock {
                operation: BaselineOperation::Capture,
                service_name: service.to_string(),
                description: if description.is_empty() {
                    None
                } else {
                    Some(description.to_string())
                },
                tags: if tags.is_empty() { None } else { Some(tags) },
                compare_date: None,
                compare_run_id: None,
            })
        }
        BaselineOperation::Compare => {
            if form.baseline_service.is_empty()
                || form.baseline_date.is_empty()
                || form.baseline_run.is_empty()
            {
                return Err(Error::Validation(
                    "サービス・日付・実行IDをすべて選択してください".to_string(),
                ));
            }
            Ok(BaselineBlock {
                operation: BaselineOperation::Compare,
                service_name: form.baseline_service.clone(),
                description: None,
                tags: None,
                compare_date: Some(form.baseline_date.clone()),
                compare_run_id: Some(form.baseline_run.clone()),
            })
        }
    }
}

/// 読み込み済みの設定ドキュメントでフォームを上書きする
///
/// 型切替時と明示的なロード操作のときだけ呼ばれる。クリア時は呼ばない。
pub fn populate_from_config(form: &mut FormState, doc: &ConfigDocument) {
    let pair = match form.test_type {
        TestType::Soap => doc.soap.as_ref(),
        TestType::Rest => doc.rest.as_ref(),
    };

    if let Some(pair) = pair {
        form.url1 = pair.api1.base_url.clone();
        form.url2 = pair.api2.base_url.clone();
        if let Some(op) = pair.api1.operations.first() {
            form.operation_name = op.name.clone();
            form.payload = op.payload_template_path.clone().unwrap_or_default();
            if let Some(method) = op.methods.first() {
                form.method = method.clone();
            }
            form.headers = op
                .headers
                .iter()
                .map(|(name, value)| HeaderRow {
                    name: name.clone(),
                    value: value.clone(),
                })
                .collect();
        }
    }

    if let Some(tokens) = &doc.tokens {
        form.tokens = tokens
            .iter()
            .map(|(name, values)| TokenRow {
                name: name.clone(),
                values: values.join("; "),
            })
            .collect();
    }

    if let Some(max) = doc.max_iterations {
        form.max_iterations = max.to_string();
    }
    if let Some(controller) = &doc.iteration_controller {
        form.iteration_controller = controller.clone();
    }
    if let Some(fields) = &doc.ignored_fields {
        form.ignored_fields = fields.join(", ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with_url() -> FormState {
        FormState {
            url1: "https://api1.example.com/rest".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_split_token_values_mixed_separators() {
        let values = split_token_values("a; b,c ;; ,d");
        assert_eq!(values, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_split_token_values_no_empty_entries() {
        assert!(split_token_values(" ; , ").is_empty());
        assert!(split_token_values("").is_empty());
    }

    #[test]
    fn test_build_config_requires_a_url() {
        let form = FormState::default();
        let err = build_config(&form).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // どちらか片方だけでも通ること
        let mut form = FormState::default();
        form.url2 = "https://api2.example.com".to_string();
        assert!(build_config(&form).is_ok());
    }

    #[test]
    fn test_build_config_excludes_empty_header_names() {
        let mut form = form_with_url();
        form.headers = vec![
            HeaderRow {
                name: "Content-Type".to_string(),
                value: "application/json".to_string(),
            },
            HeaderRow {
                name: "  ".to_string(),
                value: "ignored".to_string(),
            },
        ];
        let config = build_config(&form).expect("構築失敗");
        let headers = &config.rest.api1.operations[0].headers;
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["Content-Type"], "application/json");
    }

    #[test]
    fn test_build_config_header_roundtrip() {
        let mut form = form_with_url();
        form.headers = vec![HeaderRow {
            name: " X-Trace-Id ".to_string(),
            value: " abc-123 ".to_string(),
        }];
        let config = build_config(&form).expect("構築失敗");
        let headers = &config.rest.api1.operations[0].headers;
        assert_eq!(headers["X-Trace-Id"], "abc-123");
    }

    #[test]
    fn test_build_config_token_split() {
        let mut form = form_with_url();
        form.tokens = vec![
            TokenRow {
                name: "id".to_string(),
                values: "1; 2, 3".to_string(),
            },
            TokenRow {
                name: "".to_string(),
                values: "dropped".to_string(),
            },
        ];
        let config = build_config(&form).expect("構築失敗");
        assert_eq!(config.tokens.len(), 1);
        assert_eq!(config.tokens["id"], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_build_config_max_iterations_fallback() {
        let mut form = form_with_url();
        form.max_iterations = "abc".to_string();
        assert_eq!(build_config(&form).unwrap().max_iterations, 100);

        form.max_iterations = " 25 ".to_string();
        assert_eq!(build_config(&form).unwrap().max_iterations, 25);
    }

    #[test]
    fn test_build_config_empty_payload_is_null() {
        let form = form_with_url();
        let config = build_config(&form).unwrap();
        assert!(config.rest.api1.operations[0].payload_template_path.is_none());
        let json = serde_json::to_string(&config).expect("シリアライズ失敗");
        assert!(json.contains(r#""payloadTemplatePath":null"#));
    }

    #[test]
    fn test_build_config_method_normalized() {
        let mut form = form_with_url();
        form.method = "TRACE".to_string();
        assert_eq!(build_config(&form).unwrap().rest.api1.operations[0].methods[0], "POST");

        form.method = "DELETE".to_string();
        assert_eq!(build_config(&form).unwrap().rest.api1.operations[0].methods[0], "DELETE");
    }

    #[test]
    fn test_build_config_default_operation_name() {
        let form = form_with_url();
        assert_eq!(build_config(&form).unwrap().rest.api1.operations[0].name, "operation");
    }

    #[test]
    fn test_baseline_capture_requires_service_name() {
        let mut form = form_with_url();
        form.baseline_operation = BaselineOperation::Capture;
        form.baseline_service_name = "   ".to_string();
        assert!(matches!(baseline_block(&form), Err(Error::Validation(_))));

        form.baseline_service_name = "userService".to_string();
        form.baseline_tags = "v1, smoke".to_string();
        let block = baseline_block(&form).expect("構築失敗");
        assert_eq!(block.service_name, "userService");
        assert_eq!(block.tags.unwrap(), vec!["v1", "smoke"]);
    }

    #[test]
    fn test_baseline_compare_requires_all_selections() {
        let mut form = form_with_url();
        form.baseline_operation = BaselineOperation::Compare;
        form.baseline_service = "userService".to_string();
        form.baseline_date = "2025-11-01".to_string();
        // runが未選択
        assert!(matches!(baseline_block(&form), Err(Error::Validation(_))));

        form.baseline_run = "run-003".to_string();
        let block = baseline_block(&form).expect("構築失敗");
        assert_eq!(block.compare_date.as_deref(), Some("2025-11-01"));
        assert_eq!(block.compare_run_id.as_deref(), Some("run-003"));
    }

    #[test]
    fn test_populate_from_config_uses_active_type() {
        let doc: ConfigDocument = serde_json::from_str(
            r#"{
                "maxIterations": 50,
                "ignoredFields": ["timestamp", "traceId"],
                "tokens": {"id": ["1", "2"]},
                "rest": {
                    "api1": {"baseUrl": "https://legacy.example.com/rest", "operations": [
                        {"name": "getUser", "methods": ["GET"], "headers": {"Accept": "application/json"}}
                    ]},
                    "api2": {"baseUrl": "https://next.example.com/rest", "operations": []}
                }
            }"#,
        )
        .expect("デシリアライズ失敗");

        let mut form = FormState {
            test_type: TestType::Rest,
            ..Default::default()
        };
        populate_from_config(&mut form, &doc);

        assert_eq!(form.url1, "https://legacy.example.com/rest");
        assert_eq!(form.url2, "https://next.example.com/rest");
        assert_eq!(form.operation_name, "getUser");
        assert_eq!(form.method, "GET");
        assert_eq!(form.headers[0].name, "Accept");
        assert_eq!(form.tokens[0].values, "1; 2");
        assert_eq!(form.max_iterations, "50");
        assert_eq!(form.ignored_fields, "timestamp, traceId");
    }
}
