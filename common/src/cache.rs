//! フォームキャッシュ
//!
//! 固定キーのlocalStorageエントリ1件にフォームの一部をISOタイムスタンプ付きで
//! 保存する。7日より古い(またはタイムスタンプが壊れた)キャッシュは適用せず
//! 破棄する。保存/読込の失敗はすべて呼び出し側でログのみに留める。

use crate::error::Result;
use crate::form::FormState;
use crate::types::{HeaderRow, TestType, TokenRow};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// localStorageのキャッシュキー
pub const CACHE_KEY: &str = "apiForge_formCache";

/// キャッシュの有効期間(日)
pub const MAX_AGE_DAYS: i64 = 7;

/// 保存対象のフォームスナップショット
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheSnapshot {
    pub test_type: Option<TestType>,
    pub operation_name: String,
    pub url1: String,
    pub url2: String,
    pub method: String,
    pub payload: String,
    pub ignored_fields: String,
    pub ignore_headers: bool,
    pub enable_auth: bool,
    pub client_id: String,
    pub client_secret: String,
    pub iteration_controller: String,
    pub max_iterations: String,
    pub headers: Vec<HeaderRow>,
    pub tokens: Vec<TokenRow>,
    pub timestamp: String,
}

/// 読込結果。Expiredは破棄+削除を意味する
#[derive(Debug, Clone)]
pub enum CacheDecision {
    Apply(Box<CacheSnapshot>),
    Expired,
}

impl CacheSnapshot {
    /// フォーム状態からスナップショットを作る。名前が空の行は保存しない
    pub fn from_form(form: &FormState, now: DateTime<Utc>) -> Self {
        Self {
            test_type: Some(form.test_type),
            operation_name: form.operation_name.clone(),
            url1: form.url1.clone(),
            url2: form.url2.clone(),
            method: form.method.clone(),
            payload: form.payload.clone(),
            ignored_fields: form.ignored_fields.clone(),
            ignore_headers: form.ignore_headers,
            enable_auth: form.enable_auth,
            client_id: form.client_id.clone(),
            client_secret: form.client_secret.clone(),
            iteration_controller: form.iteration_controller.clone(),
            max_iterations: form.max_iterations.clone(),
            headers: form
                .headers
                .iter()
                .filter(|row| !row.name.trim().is_empty())
                .map(|row| HeaderRow {
                    name: row.name.trim().to_string(),
                    value: row.value.trim().to_string(),
                })
                .collect(),
            tokens: form
                .tokens
                .iter()
                .filter(|row| !row.name.trim().is_empty())
                .map(|row| TokenRow {
                    name: row.name.trim().to_string(),
                    values: row.values.trim().to_string(),
                })
                .collect(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// スナップショットをフォーム状態に適用する。空値は上書きしない
    pub fn apply(&self, form: &mut FormState) {
        if let Some(test_type) = self.test_type {
            form.test_type = test_type;
        }
        if !self.operation_name.is_empty() {
            form.operation_name = self.operation_name.clone();
        }
        if !self.url1.is_empty() {
            form.url1 = self.url1.clone();
        }
        if !self.url2.is_empty() {
            form.url2 = self.url2.clone();
        }
        if !self.method.is_empty() {
            form.method = self.method.clone();
        }
        if !self.payload.is_empty() {
            form.payload = self.payload.clone();
        }
        if !self.ignored_fields.is_empty() {
            form.ignored_fields = self.ignored_fields.clone();
        }
        form.ignore_headers = self.ignore_headers;
        form.enable_auth = self.enable_auth;
        if !self.client_id.is_empty() {
            form.client_id = self.client_id.clone();
        }
        if !self.client_secret.is_empty() {
            form.client_secret = self.client_secret.clone();
        }
        if !self.iteration_controller.is_empty() {
            form.iteration_controller = self.iteration_controller.clone();
        }
        if !self.max_iterations.is_empty() {
            form.max_iterations = self.max_iterations.clone();
        }
        if !self.headers.is_empty() {
            form.headers = self.headers.clone();
        }
        if !self.tokens.is_empty() {
            form.tokens = self.tokens.clone();
        }
    }
}

/// スナップショットをlocalStorage向けのJSONにする
pub fn encode(snapshot: &CacheSnapshot) -> Result<String> {
    Ok(serde_json::to_string(snapshot)?)
}

/// localStorageの生JSONを解釈する
///
/// JSONが壊れていればErr(呼び出し側はログのみ)。タイムスタンプが7日より
/// 古いか解釈できなければExpiredを返し、呼び出し側はエントリを削除する。
pub fn decode(raw: &str, now: DateTime<Utc>) -> Result<CacheDecision> {
    let snapshot: CacheSnapshot = serde_json::from_str(raw)?;

    let Ok(saved_at) = DateTime::parse_from_rfc3339(&snapshot.timestamp) else {
        return Ok(CacheDecision::Expired);
    };
    let age = now.signed_duration_since(saved_at.with_timezone(&Utc));
    if age > Duration::days(MAX_AGE_DAYS) {
        return Ok(CacheDecision::Expired);
    }

    Ok(CacheDecision::Apply(Box::new(snapshot)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_roundtrip_applies_fields() {
        let mut form = FormState {
            url1: "https://api1.example.com/rest".to_string(),
            operation_name: "getUser".to_string(),
            ..Default::default()
        };
        form.headers.push(HeaderRow {
            name: "Content-Type".to_string(),
            value: "application/json".to_string(),
        });
        form.headers.push(HeaderRow {
            name: "".to_string(),
            value: "未保存".to_string(),
        });
        form.tokens.push(TokenRow {
            name: "id".to_string(),
            values: "1; 2".to_string(),
        });

        let raw = encode(&CacheSnapshot::from_form(&form, now())).expect("保存失敗");
        let CacheDecision::Apply(snapshot) = decode(&raw, now()).expect("読込失敗") else {
            panic!("新しいキャッシュは適用されるべき");
        };

        // 名前が空の行は保存されない
        assert_eq!(snapshot.headers.len(), 1);

        let mut restored = FormState::default();
        snapshot.apply(&mut restored);
        assert_eq!(restored.url1, "https://api1.example.com/rest");
        assert_eq!(restored.operation_name, "getUser");
        assert_eq!(restored.headers[0].name, "Content-Type");
        assert_eq!(restored.tokens[0].values, "1; 2");
    }

    #[test]
    fn test_cache_older_than_seven_days_expires() {
        let saved = Utc.with_ymd_and_hms(2025, 11, 1, 12, 0, 0).unwrap();
        let raw = encode(&CacheSnapshot::from_form(&FormState::default(), saved)).expect("保存失敗");

        // 9日後 → 破棄
        let later = Utc.with_ymd_and_hms(2025, 11, 10, 12, 0, 0).unwrap();
        assert!(matches!(decode(&raw, later), Ok(CacheDecision::Expired)));

        // 6日後 → 適用
        let soon = Utc.with_ymd_and_hms(2025, 11, 7, 12, 0, 0).unwrap();
        assert!(matches!(decode(&raw, soon), Ok(CacheDecision::Apply(_))));
    }

    #[test]
    fn test_broken_timestamp_expires() {
        let raw = r#"{"timestamp": "not a date"}"#;
        assert!(matches!(decode(raw, now()), Ok(CacheDecision::Expired)));
    }

    #[test]
    fn test_broken_json_is_error() {
        assert!(decode("{", now()).is_err());
    }

    #[test]
    fn test_timestamp_is_iso_utc() {
        let snapshot = CacheSnapshot::from_form(&FormState::default(), now());
        assert_eq!(snapshot.timestamp, "2025-11-10T12:00:00.000Z");
    }
}
