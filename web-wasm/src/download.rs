//! ブラウザ連携ユーティリティ
//!
//! Blob経由のファイルダウンロードとクリップボードコピー。

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// テキストをファイルとしてダウンロードさせる
pub fn download_text(file_name: &str, mime_type: &str, content: &str) {
    if let Err(e) = try_download(file_name, mime_type, content) {
        web_sys::console::error_1(&format!("ダウンロードに失敗: {:?}", e).into());
    }
}

fn try_download(file_name: &str, mime_type: &str, content: &str) -> Result<(), JsValue> {
    let parts = js_sys::Array::of1(&JsValue::from_str(content));
    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    Url::revoke_object_url(&url)
}

/// クリップボードへコピーする。失敗はログのみ(致命的ではない)
pub fn copy_to_clipboard(text: String) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let clipboard = window.navigator().clipboard();
    spawn_local(async move {
        if let Err(e) = JsFuture::from(clipboard.write_text(&text)).await {
            web_sys::console::warn_1(&format!("コピーに失敗: {:?}", e).into());
        }
    });
}
