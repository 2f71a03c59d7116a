//! バックエンドAPI連携
//!
//! GET api/config, POST api/compare とベースラインカタログの読み取り。
//! fetch + JsFuture を薄く包み、エラーは表示用の文字列にして返す。

use api_forge_common::{BaselineRunInfo, ConfigDocument, ResultRecord, RunConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

fn encode_component(value: &str) -> String {
    js_sys::encode_uri_component(value).into()
}

/// fetchの共通処理。2xx以外はエラー扱い
async fn fetch_value(method: &str, url: &str, body: Option<&str>) -> Result<JsValue, JsValue> {
    let opts = RequestInit::new();
    opts.set_method(method);
    if let Some(body) = body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(url, &opts)?;
    if body.is_some() {
        request.headers().set("Content-Type", "application/json")?;
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    if !resp.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", resp.status())));
    }

    JsFuture::from(resp.json()?).await
}

/// GET api/config
pub async fn fetch_config() -> Result<ConfigDocument, String> {
    let value = fetch_value("GET", "api/config", None)
        .await
        .map_err(js_error)?;
    serde_wasm_bindgen::from_value(value).map_err(|e| e.to_string())
}

/// POST api/compare
pub async fn post_compare(config: &RunConfig) -> Result<Vec<ResultRecord>, String> {
    let body = serde_json::to_string(config).map_err(|e| e.to_string())?;
    let value = fetch_value("POST", "api/compare", Some(&body))
        .await
        .map_err(js_error)?;
    serde_wasm_bindgen::from_value(value).map_err(|e| e.to_string())
}

/// GET api/baselines/services
pub async fn fetch_baseline_services() -> Result<Vec<String>, String> {
    let value = fetch_value("GET", "api/baselines/services", None)
        .await
        .map_err(js_error)?;
    serde_wasm_bindgen::from_value(value).map_err(|e| e.to_string())
}

/// GET api/baselines/dates/{service}
pub async fn fetch_baseline_dates(service: &str) -> Result<Vec<String>, String> {
    let url = format!("api/baselines/dates/{}", encode_component(service));
    let value = fetch_value("GET", &url, None).await.map_err(js_error)?;
    serde_wasm_bindgen::from_value(value).map_err(|e| e.to_string())
}

/// GET api/baselines/runs/{service}/{date}
pub async fn fetch_baseline_runs(service: &str, date: &str) -> Result<Vec<BaselineRunInfo>, String> {
    let url = format!(
        "api/baselines/runs/{}/{}",
        encode_component(service),
        encode_component(date)
    );
    let value = fetch_value("GET", &url, None).await.map_err(js_error)?;
    serde_wasm_bindgen::from_value(value).map_err(|e| e.to_string())
}
