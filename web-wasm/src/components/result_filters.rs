//! 結果フィルタ/エクスポートバー
//!
//! 直近に描画した結果集合に対するステータスフィルタ・デバウンス付き検索と、
//! JSON/CSVのダウンロード。結果が空のときは何も表示しない。

use crate::components::toast::Toasts;
use crate::download;
use api_forge_common::{
    export_file_name, results_to_csv, results_to_json, search_haystack, visible_count,
    ResultRecord, ResultStatus, StatusFilter,
};
use chrono::Utc;
use leptos::prelude::*;

const FILTER_TABS: [(StatusFilter, &str); 4] = [
    (StatusFilter::All, "すべて"),
    (StatusFilter::Match, "MATCH"),
    (StatusFilter::Mismatch, "MISMATCH"),
    (StatusFilter::Error, "ERROR"),
];

fn count_of(results: &[ResultRecord], filter: StatusFilter) -> usize {
    results
        .iter()
        .filter(|record| filter.matches(record.status))
        .count()
}

#[component]
pub fn ResultFilters(
    results: RwSignal<Vec<ResultRecord>>,
    filter: RwSignal<StatusFilter>,
    search_input: RwSignal<String>,
    search_term: RwSignal<String>,
    toasts: Toasts,
) -> impl IntoView {
    let visible = Memo::new(move |_| {
        results.with(|records| {
            let rows: Vec<(ResultStatus, String)> = records
                .iter()
                .map(|record| (record.status, search_haystack(record)))
                .collect();
            visible_count(
                filter.get(),
                &search_term.get(),
                rows.iter().map(|(status, haystack)| (*status, haystack.as_str())),
            )
        })
    });

    let export_json = move |_| {
        results.with_untracked(|records| {
            if records.is_empty() {
                return;
            }
            match results_to_json(records) {
                Ok(text) => download::download_text(
                    &export_file_name("json", Utc::now()),
                    "application/json",
                    &text,
                ),
                Err(e) => toasts.error(format!("JSONエクスポートに失敗しました: {}", e)),
            }
        });
    };

    let export_csv = move |_| {
        results.with_untracked(|records| {
            if records.is_empty() {
                return;
            }
            match results_to_csv(records) {
                Ok(text) => {
                    download::download_text(&export_file_name("csv", Utc::now()), "text/csv", &text)
                }
                Err(e) => toasts.error(format!("CSVエクスポートに失敗しました: {}", e)),
            }
        });
    };

    view! {
        <Show when=move || results.with(|r| !r.is_empty())>
            <div class="result-filters">
                <div class="filter-tabs">
                    {FILTER_TABS
                        .iter()
                        .map(|(tab, label)| {
                            let tab = *tab;
                            let label = *label;
                            view! {
                                <button
                                    type="button"
                                    class="filter-tab"
                                    class:active=move || filter.get() == tab
                                    on:click=move |_| filter.set(tab)
                                >
                                    {label}
                                    " ("
                                    {move || results.with(|r| count_of(r, tab))}
                                    ")"
                                </button>
                            }
                        })
                        .collect_view()}
                </div>

                <input
                    type="search"
                    class="result-search"
                    placeholder="結果内を検索..."
                    prop:value=move || search_input.get()
                    on:input=move |ev| search_input.set(event_target_value(&ev))
                />

                <span class="visible-count">{move || format!("{}件表示", visible.get())}</span>

                <div class="export-buttons">
                    <button type="button" class="btn-secondary btn-small" on:click=export_json>
                        "JSONエクスポート"
                    </button>
                    <button type="button" class="btn-secondary btn-small" on:click=export_csv>
                        "CSVエクスポート"
                    </button>
                </div>
            </div>
        </Show>
    }
}
