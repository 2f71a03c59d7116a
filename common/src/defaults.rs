//! 組み込みのフォームテンプレート
//!
//! キャッシュが無いとき、および型切替・クリア時に適用するSOAP/RESTの
//! 初期値。

use crate::form::FormState;
use crate::types::{HeaderRow, TestType, TokenRow};

/// 1テンプレート分の初期値
#[derive(Debug, Clone)]
pub struct FormDefaults {
    pub operation_name: &'static str,
    pub url1: &'static str,
    pub url2: &'static str,
    pub method: &'static str,
    pub payload: &'static str,
    pub headers: &'static [(&'static str, &'static str)],
}

const SOAP_PAYLOAD: &str = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
    <soapenv:Body>
        <Placeholder>{{token}}</Placeholder>
    </soapenv:Body>
</soapenv:Envelope>"#;

const REST_PAYLOAD: &str = r#"{
  "id": "{{id}}"
}"#;

const SOAP_DEFAULTS: FormDefaults = FormDefaults {
    operation_name: "OperationName",
    url1: "https://api1.example.com/soap",
    url2: "https://api2.example.com/soap",
    method: "POST",
    payload: SOAP_PAYLOAD,
    headers: &[("Content-Type", "text/xml;charset=UTF-8")],
};

const REST_DEFAULTS: FormDefaults = FormDefaults {
    operation_name: "operationName",
    url1: "https://api1.example.com/rest",
    url2: "https://api2.example.com/rest",
    method: "POST",
    payload: REST_PAYLOAD,
    headers: &[("Content-Type", "application/json")],
};

/// テスト種別に応じたテンプレートを返す
pub fn defaults_for(test_type: TestType) -> &'static FormDefaults {
    match test_type {
        TestType::Soap => &SOAP_DEFAULTS,
        TestType::Rest => &REST_DEFAULTS,
    }
}

impl FormDefaults {
    /// テンプレートをフォームに適用する。対象はエンドポイント系フィールドと
    /// ヘッダー/トークンのみで、イテレーション設定等には触らない
    pub fn apply(&self, form: &mut FormState) {
        form.operation_name = self.operation_name.to_string();
        form.url1 = self.url1.to_string();
        form.url2 = self.url2.to_string();
        form.method = self.method.to_string();
        form.payload = self.payload.to_string();
        form.headers = self
            .headers
            .iter()
            .map(|(name, value)| HeaderRow {
                name: name.to_string(),
                value: value.to_string(),
            })
            .collect();
        form.tokens = Vec::<TokenRow>::new();
    }
}
