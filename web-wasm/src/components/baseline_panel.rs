//! ベースライン操作パネル
//!
//! LIVE/BASELINEのモード切替と、CAPTURE(取得)/COMPARE(照合)の入力。
//! COMPAREのサービス→日付→実行IDはカタログAPIから段階的に読み込む。

use crate::app::FormSignals;
use api_forge_common::{BaselineOperation, BaselineRunInfo, ComparisonMode};
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

fn warn(message: String) {
    web_sys::console::warn_1(&message.into());
}

fn run_label(run: &BaselineRunInfo) -> String {
    let mut label = run.run_id.clone();
    if let Some(description) = run.description.as_deref().filter(|d| !d.is_empty()) {
        label.push_str(" - ");
        label.push_str(description);
    }
    if let Some(tags) = run.tags.as_deref().filter(|t| !t.is_empty()) {
        label.push_str(&format!(" [{}]", tags.join(", ")));
    }
    label
}


#[component]
pub fn BaselinePanel(form: FormSignals) -> impl IntoView {
    let services = RwSignal::new(Vec::<String>::new());
    let dates = RwSignal::new(Vec::<String>::new());
    let runs = RwSignal::new(Vec::<BaselineRunInfo>::new());

    // 実行一覧を読み込み、最新(番号が最大)のものを選択する
    let load_runs = move |service: String, date: String| {
        runs.set(Vec::new());
        form.baseline_run.set(String::new());
        spawn_local(async move {
            match crate::api::fetch_baseline_runs(&service, &date).await {
                Ok(mut list) => {
                    list.sort_by_key(BaselineRunInfo::run_number);
                    form.baseline_run
                        .set(list.last().map(|run| run.run_id.clone()).unwrap_or_default());
                    runs.set(list);
                }
                Err(e) => warn(format!("実行一覧の読込に失敗: {}", e)),
            }
        });
    };

    let load_dates = move |service: String| {
        dates.set(Vec::new());
        runs.set(Vec::new());
        form.baseline_date.set(String::new());
        form.baseline_run.set(String::new());
        spawn_local(async move {
            match crate::api::fetch_baseline_dates(&service).await {
                Ok(list) => {
                    if let Some(first) = list.first().cloned() {
                        form.baseline_date.set(first.clone());
                        load_runs(service, first);
                    }
                    dates.set(list);
                }
                Err(e) => warn(format!("日付一覧の読込に失敗: {}", e)),
            }
        });
    };

    let load_services = move || {
        spawn_local(async move {
            match crate::api::fetch_baseline_services().await {
                Ok(list) => {
                    if let Some(first) = list.first().cloned() {
                        form.baseline_service.set(first.clone());
                        load_dates(first);
                    }
                    services.set(list);
                }
                Err(e) => warn(format!("サービス一覧の読込に失敗: {}", e)),
            }
        });
    };

    let is_baseline = move || form.comparison_mode.get() == ComparisonMode::Baseline;
    let is_capture = move || form.baseline_operation.get() == BaselineOperation::Capture;

    let set_live = move |_| form.comparison_mode.set(ComparisonMode::Live);
    let set_baseline = move |_| {
        form.comparison_mode.set(ComparisonMode::Baseline);
        form.baseline_operation.set(BaselineOperation::Capture);
        // CAPTUREではヘッダー比較の除外指定は使わない
        form.ignore_headers.set(false);
    };
    let set_capture = move |_| {
        form.baseline_operation.set(BaselineOperation::Capture);
        form.ignore_headers.set(false);
    };
    let set_compare = move |_| {
        form.baseline_operation.set(BaselineOperation::Compare);
        load_services();
    };

    view! {
        <div class="baseline-panel">
            <div class="mode-tabs">
                <button
                    type="button"
                    class="mode-tab"
                    class:active=move || !is_baseline()
                    on:click=set_live
                >
                    "ライブ比較"
                </button>
                <button
                    type="button"
                    class="mode-tab"
                    class:active=is_baseline
                    on:click=set_baseline
                >
                    "ベースライン"
                </button>
            </div>

            <Show when=is_baseline>
                <div class="baseline-controls">
                    <div class="op-tabs">
                        <button
                            type="button"
                            class="op-tab"
                            class:active=is_capture
                            on:click=set_capture
                        >
                            "取得"
                        </button>
                        <button
                            type="button"
                            class="op-tab"
                            class:active=move || !is_capture()
                            on:click=set_compare
                        >
                            "照合"
                        </button>
                    </div>

                    <Show
                        when=is_capture
                        fallback=move || {
                            view! {
                                <div class="compare-fields">
                                    <div class="form-group">
                                        <label>"サービス"</label>
                                        <select on:change=move |ev| {
                                            let service = event_target_value(&ev);
                                            form.baseline_service.set(service.clone());
                                            if service.is_empty() {
                                                dates.set(Vec::new());
                                                runs.set(Vec::new());
                                                form.baseline_date.set(String::new());
                                                form.baseline_run.set(String::new());
                                            } else {
                                                load_dates(service);
                                            }
                                        }>
                                            <option value="">"-- サービスを選択 --"</option>
                                            <For
                                                each=move || services.get()
                                                key=|service| service.clone()
                                                children=move |service| {
                                                    let value = service.clone();
                                                    view! {
                                                        <option
                                                            value=service.clone()
                                                            selected=move || form.baseline_service.get() == value
                                                        >
                                                            {service.clone()}
                                                        </option>
                                                    }
                                                }
                                            />
                                        </select>
                                    </div>

                                    <div class="form-group">
                                        <label>"日付"</label>
                                        <select
                                            disabled=move || dates.with(|d| d.is_empty())
                                            on:change=move |ev| {
                                                let date = event_target_value(&ev);
                                                form.baseline_date.set(date.clone());
                                                if date.is_empty() {
                                                    runs.set(Vec::new());
                                                    form.baseline_run.set(String::new());
                                                } else {
                                                    load_runs(form.baseline_service.get_untracked(), date);
                                                }
                                            }
                                        >
                                            <option value="">"-- 日付を選択 --"</option>
                                            <For
                                                each=move || dates.get()
                                                key=|date| date.clone()
                                                children=move |date| {
                                                    let value = date.clone();
                                                    view! {
                                                        <option
                                                            value=date.clone()
                                                            selected=move || form.baseline_date.get() == value
                                                        >
                                                            {date.clone()}
                                                        </option>
                                                    }
                                                }
                                            />
                                        </select>
                                    </div>

                                    <div class="form-group">
                                        <label>"実行"</label>
                                        <select
                                            disabled=move || runs.with(|r| r.is_empty())
                                            on:change=move |ev| form.baseline_run.set(event_target_value(&ev))
                                        >
                                            <option value="">"-- 実行を選択 --"</option>
                                            <For
                                                each=move || runs.get()
                                                key=|run| run.run_id.clone()
                                                children=move |run| {
                                                    let value = run.run_id.clone();
                                                    view! {
                                                        <option
                                                            value=run.run_id.clone()
                                                            selected=move || form.baseline_run.get() == value
                                                        >
                                                            {run_label(&run)}
                                                        </option>
                                                    }
                                                }
                                            />
                                        </select>
                                    </div>
                                </div>
                            }
                        }
                    >
                        <div class="capture-fields">
                            <div class="form-group">
                                <label for="baseline-service-name">"サービス名"</label>
                                <input
                                    type="text"
                                    id="baseline-service-name"
                                    placeholder="userService"
                                    prop:value=move || form.baseline_service_name.get()
                                    on:input=move |ev| {
                                        form.baseline_service_name.set(event_target_value(&ev))
                                    }
                                />
                            </div>
                            <div class="form-group">
                                <label for="baseline-description">"説明"</label>
                                <input
                                    type="text"
                                    id="baseline-description"
                                    prop:value=move || form.baseline_description.get()
                                    on:input=move |ev| {
                                        form.baseline_description.set(event_target_value(&ev))
                                    }
                                />
                            </div>
                            <div class="form-group">
                                <label for="baseline-tags">"タグ(,区切り)"</label>
                                <input
                                    type="text"
                                    id="baseline-tags"
                                    placeholder="v1, smoke"
                                    prop:value=move || form.baseline_tags.get()
                                    on:input=move |ev| form.baseline_tags.set(event_target_value(&ev))
                                />
                            </div>
                        </div>
                    </Show>
                </div>
            </Show>
        </div>
    }
}
