//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"API Forge - APIレスポンス比較"</h1>
            <p class="text-muted">"2つのエンドポイントの応答をイテレーション毎に比較します"</p>
        </header>
    }
}
