//! 比較設定フォームコンポーネント
//!
//! エンドポイント・リクエスト・イテレーション・認証の各入力と実行ボタン。
//! 実行中はボタンを無効化して多重送信を防ぐ。

use crate::app::{confirm, FormSignals};
use crate::components::kv_table::KvTable;
use crate::components::payload_editor::PayloadEditor;
use crate::components::toast::Toasts;
use api_forge_common::{form::METHODS, BaselineOperation, ComparisonMode, TestType};
use leptos::prelude::*;

#[component]
pub fn ConfigForm<FT, FL, FC, FS>(
    form: FormSignals,
    is_running: RwSignal<bool>,
    toasts: Toasts,
    on_type_change: FT,
    on_load_config: FL,
    on_clear: FC,
    on_submit: FS,
) -> impl IntoView
where
    FT: Fn(TestType) + 'static + Clone + Send,
    FL: Fn(()) + 'static + Clone + Send,
    FC: Fn(()) + 'static + Clone + Send,
    FS: Fn(()) + 'static + Clone + Send,
{
    let is_baseline = move || form.comparison_mode.get() == ComparisonMode::Baseline;
    let is_capture = move || {
        is_baseline() && form.baseline_operation.get() == BaselineOperation::Capture
    };
    let is_compare_op = move || {
        is_baseline() && form.baseline_operation.get() == BaselineOperation::Compare
    };

    let submit_label = move || {
        if is_running.get() {
            "実行中...".to_string()
        } else if is_capture() {
            "📸 ベースラインを取得".to_string()
        } else if is_compare_op() {
            "🔍 ベースラインと比較".to_string()
        } else {
            "▶ 比較を実行".to_string()
        }
    };

    // GETに切り替えたときはペイロードのクリアを提案する
    let on_method_change = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        if value == "GET"
            && !form.payload.get_untracked().is_empty()
            && confirm("GETリクエストは通常ペイロードを持ちません。ペイロード欄をクリアしますか？")
        {
            form.payload.set(String::new());
        }
        form.method.set(value);
    };

    view! {
        <form class="config-form" on:submit=|ev| ev.prevent_default()>
            <div class="form-group">
                <label>"テスト種別"</label>
                <div class="type-toggle">
                    <button
                        type="button"
                        class="toggle-btn"
                        class:active=move || form.test_type.get() == TestType::Rest
                        on:click={
                            let on_type_change = on_type_change.clone();
                            move |_| on_type_change(TestType::Rest)
                        }
                    >
                        "REST"
                    </button>
                    <button
                        type="button"
                        class="toggle-btn"
                        class:active=move || form.test_type.get() == TestType::Soap
                        on:click={
                            let on_type_change = on_type_change.clone();
                            move |_| on_type_change(TestType::Soap)
                        }
                    >
                        "SOAP"
                    </button>
                </div>
            </div>

            <div class="form-group">
                <label for="operation-name">"オペレーション名"</label>
                <input
                    type="text"
                    id="operation-name"
                    prop:value=move || form.operation_name.get()
                    on:input=move |ev| form.operation_name.set(event_target_value(&ev))
                />
            </div>

            <div class="form-group">
                <label for="url1">"URL 1"</label>
                <input
                    type="text"
                    id="url1"
                    placeholder="https://api1.example.com/..."
                    prop:value=move || form.url1.get()
                    on:input=move |ev| form.url1.set(event_target_value(&ev))
                />
            </div>

            // BASELINEモードではURL 2は使わない
            <div class="form-group" style:display=move || if is_baseline() { "none" } else { "block" }>
                <label for="url2">"URL 2"</label>
                <input
                    type="text"
                    id="url2"
                    placeholder="https://api2.example.com/..."
                    prop:value=move || form.url2.get()
                    on:input=move |ev| form.url2.set(event_target_value(&ev))
                />
            </div>

            <div class="form-group">
                <label for="method">"メソッド"</label>
                <select id="method" on:change=on_method_change>
                    {METHODS
                        .iter()
                        .map(|method| {
                            let method = *method;
                            view! {
                                <option
                                    value=method
                                    selected=move || form.method.get() == method
                                >
                                    {method}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>

            <PayloadEditor payload=form.payload toasts=toasts />

            <div class="form-group">
                <label>"ヘッダー"</label>
                <KvTable
                    rows=form.headers
                    key_placeholder="Header Name"
                    value_placeholder="Value"
                    add_label="＋ ヘッダーを追加"
                />
            </div>

            <div class="form-group">
                <label>"トークン"</label>
                <KvTable
                    rows=form.tokens
                    key_placeholder="Token Name"
                    value_placeholder="Values (;区切り)"
                    add_label="＋ トークンを追加"
                />
            </div>

            <div class="form-group">
                <label for="ignored-fields">"比較から除外するフィールド"</label>
                <input
                    type="text"
                    id="ignored-fields"
                    placeholder="timestamp, traceId"
                    prop:value=move || form.ignored_fields.get()
                    on:input=move |ev| form.ignored_fields.set(event_target_value(&ev))
                />
            </div>

            <div class="form-group">
                <label class="checkbox-label" class:disabled-label=is_capture>
                    <input
                        type="checkbox"
                        prop:checked=move || form.ignore_headers.get()
                        disabled=is_capture
                        on:change=move |ev| form.ignore_headers.set(event_target_checked(&ev))
                    />
                    "ヘッダーを比較しない"
                </label>
            </div>

            <div class="form-row">
                <div class="form-group">
                    <label for="max-iterations">"最大イテレーション数"</label>
                    <input
                        type="text"
                        id="max-iterations"
                        prop:value=move || form.max_iterations.get()
                        on:input=move |ev| form.max_iterations.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="iteration-controller">"イテレーション方式"</label>
                    <select
                        id="iteration-controller"
                        on:change=move |ev| form.iteration_controller.set(event_target_value(&ev))
                    >
                        <option
                            value="ONE_BY_ONE"
                            selected=move || form.iteration_controller.get() == "ONE_BY_ONE"
                        >
                            "ONE_BY_ONE"
                        </option>
                    </select>
                </div>
            </div>

            <div class="form-group">
                <label class="checkbox-label">
                    <input
                        type="checkbox"
                        prop:checked=move || form.enable_auth.get()
                        on:change=move |ev| form.enable_auth.set(event_target_checked(&ev))
                    />
                    "Basic認証を使う"
                </label>
                <div class="auth-fields">
                    <input
                        type="text"
                        placeholder="Client ID"
                        disabled=move || !form.enable_auth.get()
                        prop:value=move || form.client_id.get()
                        on:input=move |ev| form.client_id.set(event_target_value(&ev))
                    />
                    <input
                        type="password"
                        placeholder="Client Secret"
                        disabled=move || !form.enable_auth.get()
                        prop:value=move || form.client_secret.get()
                        on:input=move |ev| form.client_secret.set(event_target_value(&ev))
                    />
                </div>
            </div>

            <div class="button-row">
                <button
                    type="button"
                    class="btn btn-primary"
                    disabled=move || is_running.get()
                    on:click={
                        let on_submit = on_submit.clone();
                        move |_| on_submit(())
                    }
                >
                    {submit_label}
                </button>
                <button
                    type="button"
                    class="btn btn-secondary"
                    disabled=move || is_running.get() || is_compare_op()
                    on:click={
                        let on_clear = on_clear.clone();
                        move |_| on_clear(())
                    }
                >
                    "クリア"
                </button>
                <button
                    type="button"
                    class="btn btn-secondary"
                    disabled=move || is_running.get()
                    on:click={
                        let on_load_config = on_load_config.clone();
                        move |_| on_load_config(())
                    }
                >
                    "サーバ設定を読み込む"
                </button>
            </div>
        </form>
    }
}
