//! 結果表示パネル
//!
//! サマリ(件数)と折りたたみ式の結果エントリ。詳細(ヘッダー/ペイロード)は
//! 展開時に初めて描画する。左右ペインのスクロールは同期し、各ペインに
//! コピー操作を付ける。

use crate::download;
use api_forge_common::{
    is_visible, pretty_or_raw, search_haystack, visible_count, ResultRecord, ResultStatus,
    StatusFilter,
};
use leptos::html;
use leptos::prelude::*;
use std::collections::BTreeMap;

fn render_headers(headers: Option<&BTreeMap<String, String>>) -> String {
    match headers {
        Some(map) if !map.is_empty() => map
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => "[No Headers]".to_string(),
    }
}

fn status_class(status: ResultStatus) -> &'static str {
    match status {
        ResultStatus::Match => "status-badge status-match",
        ResultStatus::Mismatch => "status-badge status-mismatch",
        ResultStatus::Error => "status-badge status-error",
    }
}


#[component]
pub fn ResultsPanel(
    results: RwSignal<Vec<ResultRecord>>,
    run_error: RwSignal<Option<String>>,
    is_running: RwSignal<bool>,
    has_run: RwSignal<bool>,
    filter: RwSignal<StatusFilter>,
    search_term: RwSignal<String>,
) -> impl IntoView {
    // (連番, 開閉)。連番の変化で全エントリが追従する
    let expand_all = RwSignal::new((0u32, false));

    let count_by = move |status: ResultStatus| {
        results.with(|records| records.iter().filter(|r| r.status == status).count())
    };

    let no_visible = Memo::new(move |_| {
        results.with(|records| {
            if records.is_empty() {
                return false;
            }
            let rows: Vec<(ResultStatus, String)> = records
                .iter()
                .map(|record| (record.status, search_haystack(record)))
                .collect();
            visible_count(
                filter.get(),
                &search_term.get(),
                rows.iter().map(|(status, haystack)| (*status, haystack.as_str())),
            ) == 0
        })
    });

    view! {
        <div class="results-container">
            <Show when=move || run_error.with(|e| e.is_some())>
                <div class="error-msg">{move || run_error.get().unwrap_or_default()}</div>
            </Show>

            <Show when=move || is_running.get()>
                <div class="progress-indicator">
                    <div class="progress-bar-anim"></div>
                    <p class="text-muted">"実行中..."</p>
                </div>
            </Show>

            <Show when=move || {
                has_run.get() && !is_running.get() && run_error.with(|e| e.is_none())
                    && results.with(|r| r.is_empty())
            }>
                <div class="empty-state">"結果はありません"</div>
            </Show>

            <Show when=move || results.with(|r| !r.is_empty())>
                <div class="summary-card">
                    <div class="summary-head">
                        <span class="summary-title">"📊 比較結果サマリ"</span>
                        <div class="summary-actions">
                            <button
                                type="button"
                                class="btn-secondary btn-small"
                                on:click=move |_| {
                                    expand_all.update(|(seq, open)| {
                                        *seq += 1;
                                        *open = true;
                                    })
                                }
                            >
                                "↕ すべて展開"
                            </button>
                            <button
                                type="button"
                                class="btn-secondary btn-small"
                                on:click=move |_| {
                                    expand_all.update(|(seq, open)| {
                                        *seq += 1;
                                        *open = false;
                                    })
                                }
                            >
                                "↑ すべて折りたたむ"
                            </button>
                        </div>
                    </div>
                    <div class="summary-counts">
                        <div class="summary-count">
                            <span class="count-label">"TOTAL"</span>
                            <span class="count-value">{move || results.with(|r| r.len())}</span>
                        </div>
                        <div class="summary-count">
                            <span class="count-label">"MATCH"</span>
                            <span class="count-value match">{move || count_by(ResultStatus::Match)}</span>
                        </div>
                        <div class="summary-count">
                            <span class="count-label">"MISMATCH"</span>
                            <span class="count-value mismatch">
                                {move || count_by(ResultStatus::Mismatch)}
                            </span>
                        </div>
                        <div class="summary-count">
                            <span class="count-label">"ERROR"</span>
                            <span class="count-value error">{move || count_by(ResultStatus::Error)}</span>
                        </div>
                    </div>
                </div>

                {move || {
                    results
                        .get()
                        .into_iter()
                        .enumerate()
                        .map(|(index, record)| {
                            view! {
                                <ResultEntry
                                    record=record
                                    index=index
                                    filter=filter
                                    search_term=search_term
                                    expand_all=expand_all
                                />
                            }
                        })
                        .collect_view()
                }}

                <Show when=move || no_visible.get()>
                    <div class="empty-state no-results-message">
                        "フィルタ/検索に一致する結果がありません"
                    </div>
                </Show>
            </Show>
        </div>
    }
}

#[component]
fn ResultEntry(
    record: ResultRecord,
    index: usize,
    filter: RwSignal<StatusFilter>,
    search_term: RwSignal<String>,
    expand_all: RwSignal<(u32, bool)>,
) -> impl IntoView {
    let status = record.status;
    let haystack = search_haystack(&record);
    let expanded = RwSignal::new(false);

    // 「すべて展開/折りたたむ」に追従する。初回実行では何もしない
    Effect::new(move |prev: Option<u32>| {
        let (seq, open) = expand_all.get();
        if let Some(prev_seq) = prev {
            if prev_seq != seq {
                expanded.set(open);
            }
        }
        seq
    });

    let visible = move || is_visible(filter.get(), &search_term.get(), status, &haystack);

    let url1_line = record
        .api1
        .as_ref()
        .and_then(|side| side.url.clone())
        .unwrap_or_default();
    let url2_line = match record.api2.as_ref().and_then(|side| side.url.clone()) {
        Some(url) => url,
        None if record.baseline_capture_timestamp.is_some() => "ベースライン".to_string(),
        None => String::new(),
    };
    let tokens_line = record.iteration_tokens.as_ref().and_then(|tokens| {
        if tokens.is_empty() {
            None
        } else {
            Some(format!(
                "Tokens: {}",
                tokens
                    .iter()
                    .map(|(name, value)| format!("{}={}", name, value))
                    .collect::<Vec<_>>()
                    .join("; ")
            ))
        }
    });

    let title = format!("#{} - {}", index + 1, record.operation_name);
    let detail_record = record.clone();

    view! {
        <div class="result-item" style:display=move || if visible() { "block" } else { "none" }>
            <div
                class="result-header"
                class:open=move || expanded.get()
                on:click=move |_| expanded.update(|open| *open = !*open)
            >
                <div class="result-title">
                    <div class="result-name">{title}</div>
                    <div class="result-url">"1: " {url1_line}</div>
                    <div class="result-url">"2: " {url2_line}</div>
                    {tokens_line.map(|line| view! { <div class="result-tokens">{line}</div> })}
                </div>
                <span class=status_class(status)>{status.as_str()}</span>
            </div>
            <Show when=move || expanded.get()>
                {
                    let record = detail_record.clone();
                    move || detail_view(&record)
                }
            </Show>
        </div>
    }
}

/// 展開時にだけ組み立てる詳細ビュー
fn detail_view(record: &ResultRecord) -> impl IntoView {
    // ベースライン取得タイムスタンプがある場合のみAPI2パネルを出さない
    let show_api2 = record.api2.is_some() && record.baseline_capture_timestamp.is_none();

    let api1 = record.api1.clone().unwrap_or_default();
    let api2 = record.api2.clone().unwrap_or_default();

    let differences = record.differences.clone().unwrap_or_default();
    let error_message = record.error_message.clone();
    let durations = {
        let d1 = api1.duration;
        let d2 = show_api2.then_some(api2.duration).flatten();
        match (d1, d2) {
            (Some(d1), Some(d2)) => Some(format!("所要時間: API1 {}ms / API2 {}ms", d1, d2)),
            (Some(d1), None) => Some(format!("所要時間: {}ms", d1)),
            _ => None,
        }
    };

    let request_headers_1 = render_headers(api1.request_headers.as_ref());
    let request_headers_2 = show_api2.then(|| render_headers(api2.request_headers.as_ref()));
    let request_payload_1 = pretty_or_raw(api1.request_payload.as_deref().unwrap_or(""));
    let request_payload_2 =
        show_api2.then(|| pretty_or_raw(api2.request_payload.as_deref().unwrap_or("")));
    let response_headers_1 = render_headers(api1.response_headers.as_ref());
    let response_headers_2 = show_api2.then(|| render_headers(api2.response_headers.as_ref()));
    let response_payload_1 = pretty_or_raw(api1.response_payload.as_deref().unwrap_or(""));
    let response_payload_2 =
        show_api2.then(|| pretty_or_raw(api2.response_payload.as_deref().unwrap_or("")));

    view! {
        <div class="result-body">
            {(!differences.is_empty())
                .then(|| {
                    view! {
                        <div class="mismatch-details">
                            <strong>"⚠️ 差分:"</strong>
                            <ul>
                                {differences
                                    .iter()
                                    .map(|diff| view! { <li>{diff.clone()}</li> })
                                    .collect_view()}
                            </ul>
                        </div>
                    }
                })}
            {error_message.map(|message| {
                view! { <div class="error-msg">"HTTPエラー: " {message}</div> }
            })}
            {durations.map(|line| view! { <div class="duration-line">{line}</div> })}

            <SyncedPanes
                title="📤 リクエストヘッダー"
                left=request_headers_1
                right=request_headers_2
            />
            <SyncedPanes
                title="📝 リクエストペイロード"
                left=request_payload_1
                right=request_payload_2
            />
            <SyncedPanes
                title="📥 レスポンスヘッダー"
                left=response_headers_1
                right=response_headers_2
            />
            <SyncedPanes
                title="📦 レスポンスペイロード"
                left=response_payload_1
                right=response_payload_2
            />
        </div>
    }
}

/// 左右ペイン。両方あるときはスクロール位置を相互に同期する
#[component]
fn SyncedPanes(title: &'static str, left: String, right: Option<String>) -> impl IntoView {
    let left_ref = NodeRef::<html::Pre>::new();
    let right_ref = NodeRef::<html::Pre>::new();

    let left_copy = left.clone();
    let right_copy = right.clone().unwrap_or_default();
    let dual = right.is_some();

    let sync_from_left = move |_| {
        if let (Some(from), Some(to)) = (left_ref.get_untracked(), right_ref.get_untracked()) {
            to.set_scroll_top(from.scroll_top());
            to.set_scroll_left(from.scroll_left());
        }
    };
    let sync_from_right = move |_| {
        if let (Some(from), Some(to)) = (right_ref.get_untracked(), left_ref.get_untracked()) {
            to.set_scroll_top(from.scroll_top());
            to.set_scroll_left(from.scroll_left());
        }
    };

    view! {
        <div class="result-subsection">
            <div class="subsection-title">{title}</div>
            <div class="pane-row">
                <div class="pane">
                    {dual.then(|| view! { <div class="pane-label">"API 1"</div> })}
                    <button
                        type="button"
                        class="copy-btn"
                        on:click=move |_| download::copy_to_clipboard(left_copy.clone())
                    >
                        "コピー"
                    </button>
                    <pre class="pane-content" node_ref=left_ref on:scroll=sync_from_left>
                        {left}
                    </pre>
                </div>
                {right.map(|right_text| {
                    view! {
                        <div class="pane">
                            <div class="pane-label">"API 2"</div>
                            <button
                                type="button"
                                class="copy-btn"
                                on:click=move |_| download::copy_to_clipboard(right_copy.clone())
                            >
                                "コピー"
                            </button>
                            <pre class="pane-content" node_ref=right_ref on:scroll=sync_from_right>
                                {right_text}
                            </pre>
                        </div>
                    }
                })}
            </div>
        </div>
    }
}
