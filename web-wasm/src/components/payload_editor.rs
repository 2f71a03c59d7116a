//! ペイロードエディタコンポーネント
//!
//! テキストエリアと自動整形ボタン。整形の成否はトーストで通知し、
//! JSONの解析に失敗してもフィールドは変更しない。

use crate::components::toast::Toasts;
use api_forge_common::{format_payload, Error, Formatted};
use leptos::prelude::*;

#[component]
pub fn PayloadEditor(payload: RwSignal<String>, toasts: Toasts) -> impl IntoView {
    let on_format = move |_| {
        let current = payload.get_untracked();
        match format_payload(&current) {
            Ok(Formatted::Json(text)) => {
                payload.set(text);
                toasts.success("JSONを整形しました");
            }
            Ok(Formatted::Xml(text)) => {
                payload.set(text);
                toasts.success("XMLを整形しました");
            }
            Ok(Formatted::Untouched) => {}
            Err(Error::Json(e)) => toasts.error(format!("JSONが不正です: {}", e)),
            Err(e) => toasts.error(e.to_string()),
        }
    };

    view! {
        <div class="form-group">
            <label for="payload">"ペイロードテンプレート"</label>
            <textarea
                id="payload"
                rows="10"
                placeholder="JSONまたはXML。{{token}} がイテレーション毎に置換されます"
                prop:value=move || payload.get()
                on:input=move |ev| payload.set(event_target_value(&ev))
            ></textarea>
            <button type="button" class="btn-secondary btn-small" on:click=on_format>
                "✨ 自動整形"
            </button>
        </div>
    }
}
