//! 名前/値テーブルコンポーネント
//!
//! ヘッダー行・トークン行で共用する動的テーブル。行の追加・編集・削除のみで、
//! 空名行の除外はRunConfig構築とキャッシュ保存の側で行う。

use api_forge_common::HeaderRow;
use leptos::prelude::*;

#[component]
pub fn KvTable(
    rows: RwSignal<Vec<HeaderRow>>,
    key_placeholder: &'static str,
    value_placeholder: &'static str,
    add_label: &'static str,
) -> impl IntoView {
    view! {
        <table class="kv-table">
            <tbody>
                <For
                    each=move || 0..rows.with(|r| r.len())
                    key=|index| *index
                    children=move |index| {
                        view! {
                            <tr>
                                <td>
                                    <input
                                        type="text"
                                        class="key-input"
                                        placeholder=key_placeholder
                                        prop:value=move || {
                                            rows.with(|r| {
                                                r.get(index).map(|row| row.name.clone()).unwrap_or_default()
                                            })
                                        }
                                        on:input=move |ev| {
                                            let value = event_target_value(&ev);
                                            rows.update(|r| {
                                                if let Some(row) = r.get_mut(index) {
                                                    row.name = value;
                                                }
                                            });
                                        }
                                    />
                                </td>
                                <td>
                                    <input
                                        type="text"
                                        class="value-input"
                                        placeholder=value_placeholder
                                        prop:value=move || {
                                            rows.with(|r| {
                                                r.get(index).map(|row| row.value.clone()).unwrap_or_default()
                                            })
                                        }
                                        on:input=move |ev| {
                                            let value = event_target_value(&ev);
                                            rows.update(|r| {
                                                if let Some(row) = r.get_mut(index) {
                                                    row.value = value;
                                                }
                                            });
                                        }
                                    />
                                </td>
                                <td>
                                    <button
                                        type="button"
                                        class="btn-remove"
                                        on:click=move |_| {
                                            rows.update(|r| {
                                                if index < r.len() {
                                                    r.remove(index);
                                                }
                                            });
                                        }
                                    >
                                        "×"
                                    </button>
                                </td>
                            </tr>
                        }
                    }
                />
            </tbody>
        </table>
        <button
            type="button"
            class="btn-secondary btn-small"
            on:click=move |_| rows.update(|r| r.push(HeaderRow::default()))
        >
            {add_label}
        </button>
    }
}
