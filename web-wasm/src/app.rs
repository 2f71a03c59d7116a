//! メインアプリケーションコンポーネント
//!
//! フォーム全項目をシグナルの束(FormSignals)として保持し、純ロジックは
//! api-forge-common側の関数に委譲する。ネットワーク呼び出しは同時に1件のみで、
//! 実行ボタンの無効化によって直列化する。

use crate::api;
use crate::components::{
    baseline_panel::BaselinePanel,
    config_form::ConfigForm,
    header::Header,
    result_filters::ResultFilters,
    results_panel::ResultsPanel,
    toast::{ToastHost, Toasts},
};
use crate::storage;
use api_forge_common::{
    baseline_block, build_config, defaults_for, populate_from_config, BaselineOperation,
    ComparisonMode, ConfigDocument, FormState, HeaderRow, ResultRecord, StatusFilter, TestType,
    TokenRow,
};
use leptos::leptos_dom::helpers::{set_timeout_with_handle, TimeoutHandle};
use leptos::prelude::*;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// フォーム全項目のシグナル束。トークン行もUI上はname/valueの2列で扱う
#[derive(Clone, Copy)]
pub struct FormSignals {
    pub test_type: RwSignal<TestType>,
    pub operation_name: RwSignal<String>,
    pub url1: RwSignal<String>,
    pub url2: RwSignal<String>,
    pub method: RwSignal<String>,
    pub payload: RwSignal<String>,
    pub ignored_fields: RwSignal<String>,
    pub ignore_headers: RwSignal<bool>,
    pub max_iterations: RwSignal<String>,
    pub iteration_controller: RwSignal<String>,
    pub enable_auth: RwSignal<bool>,
    pub client_id: RwSignal<String>,
    pub client_secret: RwSignal<String>,
    pub headers: RwSignal<Vec<HeaderRow>>,
    pub tokens: RwSignal<Vec<HeaderRow>>,
    pub comparison_mode: RwSignal<ComparisonMode>,
    pub baseline_operation: RwSignal<BaselineOperation>,
    pub baseline_service_name: RwSignal<String>,
    pub baseline_description: RwSignal<String>,
    pub baseline_tags: RwSignal<String>,
    pub baseline_service: RwSignal<String>,
    pub baseline_date: RwSignal<String>,
    pub baseline_run: RwSignal<String>,
}

impl FormSignals {
    pub fn new() -> Self {
        let initial = FormState::default();
        Self {
            test_type: RwSignal::new(initial.test_type),
            operation_name: RwSignal::new(initial.operation_name),
            url1: RwSignal::new(initial.url1),
            url2: RwSignal::new(initial.url2),
            method: RwSignal::new(initial.method),
            payload: RwSignal::new(initial.payload),
            ignored_fields: RwSignal::new(initial.ignored_fields),
            ignore_headers: RwSignal::new(initial.ignore_headers),
            max_iterations: RwSignal::new(initial.max_iterations),
            iteration_controller: RwSignal::new(initial.iteration_controller),
            enable_auth: RwSignal::new(initial.enable_auth),
            client_id: RwSignal::new(initial.client_id),
            client_secret: RwSignal::new(initial.client_secret),
            headers: RwSignal::new(initial.headers),
            tokens: RwSignal::new(Vec::new()),
            comparison_mode: RwSignal::new(initial.comparison_mode),
            baseline_operation: RwSignal::new(initial.baseline_operation),
            baseline_service_name: RwSignal::new(initial.baseline_service_name),
            baseline_description: RwSignal::new(initial.baseline_description),
            baseline_tags: RwSignal::new(initial.baseline_tags),
            baseline_service: RwSignal::new(initial.baseline_service),
            baseline_date: RwSignal::new(initial.baseline_date),
            baseline_run: RwSignal::new(initial.baseline_run),
        }
    }

    /// 現在値をビューモデルとして読み出す(非トラッキング)
    pub fn snapshot(&self) -> FormState {
        FormState {
            test_type: self.test_type.get_untracked(),
            operation_name: self.operation_name.get_untracked(),
            url1: self.url1.get_untracked(),
            url2: self.url2.get_untracked(),
            method: self.method.get_untracked(),
            payload: self.payload.get_untracked(),
            ignored_fields: self.ignored_fields.get_untracked(),
            ignore_headers: self.ignore_headers.get_untracked(),
            max_iterations: self.max_iterations.get_untracked(),
            iteration_controller: self.iteration_controller.get_untracked(),
            enable_auth: self.enable_auth.get_untracked(),
            client_id: self.client_id.get_untracked(),
            client_secret: self.client_secret.get_untracked(),
            headers: self.headers.get_untracked(),
            tokens: self
                .tokens
                .get_untracked()
                .into_iter()
                .map(|row| TokenRow {
                    name: row.name,
                    values: row.value,
                })
                .collect(),
            comparison_mode: self.comparison_mode.get_untracked(),
            baseline_operation: self.baseline_operation.get_untracked(),
            baseline_service_name: self.baseline_service_name.get_untracked(),
            baseline_description: self.baseline_description.get_untracked(),
            baseline_tags: self.baseline_tags.get_untracked(),
            baseline_service: self.baseline_service.get_untracked(),
            baseline_date: self.baseline_date.get_untracked(),
            baseline_run: self.baseline_run.get_untracked(),
        }
    }

    /// ビューモデルを全シグナルへ書き戻す
    pub fn set_form(&self, form: FormState) {
        self.test_type.set(form.test_type);
        self.operation_name.set(form.operation_name);
        self.url1.set(form.url1);
        self.url2.set(form.url2);
        self.method.set(form.method);
        self.payload.set(form.payload);
        self.ignored_fields.set(form.ignored_fields);
        self.ignore_headers.set(form.ignore_headers);
        self.max_iterations.set(form.max_iterations);
        self.iteration_controller.set(form.iteration_controller);
        self.enable_auth.set(form.enable_auth);
        self.client_id.set(form.client_id);
        self.client_secret.set(form.client_secret);
        self.headers.set(form.headers);
        self.tokens.set(
            form.tokens
                .into_iter()
                .map(|row| HeaderRow {
                    name: row.name,
                    value: row.values,
                })
                .collect(),
        );
        self.comparison_mode.set(form.comparison_mode);
        self.baseline_operation.set(form.baseline_operation);
        self.baseline_service_name.set(form.baseline_service_name);
        self.baseline_description.set(form.baseline_description);
        self.baseline_tags.set(form.baseline_tags);
        self.baseline_service.set(form.baseline_service);
        self.baseline_date.set(form.baseline_date);
        self.baseline_run.set(form.baseline_run);
    }

    /// 自動保存用: 保存対象のシグナルをすべてトラッキングする
    pub fn watch(&self) {
        self.test_type.track();
        self.operation_name.track();
        self.url1.track();
        self.url2.track();
        self.method.track();
        self.payload.track();
        self.ignored_fields.track();
        self.ignore_headers.track();
        self.max_iterations.track();
        self.iteration_controller.track();
        self.enable_auth.track();
        self.client_id.track();
        self.client_secret.track();
        self.headers.track();
        self.tokens.track();
    }
}

/// 同期アラート。検証エラーの通知に使う
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// 同期確認ダイアログ
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// デバウンス実行。直前の未発火タイマーだけが生き残る
pub fn debounce(
    timer: RwSignal<Option<TimeoutHandle>>,
    delay: Duration,
    callback: impl FnOnce() + 'static,
) {
    if let Some(handle) = timer.get_untracked() {
        handle.clear();
    }
    match set_timeout_with_handle(callback, delay) {
        Ok(handle) => timer.set(Some(handle)),
        Err(e) => web_sys::console::warn_1(&format!("タイマー設定に失敗: {:?}", e).into()),
    }
}

fn apply_template(form: &mut FormState, test_type: TestType) {
    form.test_type = test_type;
    defaults_for(test_type).apply(form);
    form.enable_auth = false;
    form.client_id.clear();
    form.client_secret.clear();
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let form = FormSignals::new();
    let toasts = Toasts::new();

    let loaded_config = RwSignal::new(None::<ConfigDocument>);
    let results = RwSignal::new(Vec::<ResultRecord>::new());
    let run_error = RwSignal::new(None::<String>);
    let is_running = RwSignal::new(false);
    let has_run = RwSignal::new(false);

    let filter = RwSignal::new(StatusFilter::All);
    let search_input = RwSignal::new(String::new());
    let search_term = RwSignal::new(String::new());

    let save_timer = RwSignal::new(None::<TimeoutHandle>);
    let search_timer = RwSignal::new(None::<TimeoutHandle>);

    // 起動時: キャッシュがあれば復元、なければテンプレート適用
    match storage::load() {
        Some(snapshot) => {
            let mut state = form.snapshot();
            snapshot.apply(&mut state);
            form.set_form(state);
        }
        None => {
            let mut state = form.snapshot();
            defaults_for(state.test_type).apply(&mut state);
            form.set_form(state);
        }
    }

    // 自動保存: 最後の変更から1秒後に1回だけ書き込む
    Effect::new(move |_| {
        form.watch();
        debounce(save_timer, Duration::from_millis(1000), move || {
            storage::save_now(&form.snapshot());
        });
    });

    // ページ離脱時は無条件で即時保存
    if let Some(window) = web_sys::window() {
        let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
            storage::save_now(&form.snapshot());
        }) as Box<dyn FnMut(web_sys::Event)>);
        let _ = window
            .add_event_listener_with_callback("beforeunload", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // 検索語は300msデバウンスで反映する
    Effect::new(move |_| {
        let value = search_input.get();
        debounce(search_timer, Duration::from_millis(300), move || {
            search_term.set(value);
        });
    });

    // 型切替: テンプレートに戻し、設定が読み込み済みならそこから補完する
    let on_type_change = move |test_type: TestType| {
        let mut state = form.snapshot();
        apply_template(&mut state, test_type);
        if let Some(doc) = loaded_config.get_untracked() {
            populate_from_config(&mut state, &doc);
        }
        form.set_form(state);
    };

    // 明示的なロード操作のみがapi/configを読む
    let on_load_config = move |_: ()| {
        spawn_local(async move {
            match api::fetch_config().await {
                Ok(doc) => {
                    let mut state = form.snapshot();
                    if let Some(test_type) = doc.test_type {
                        state.test_type = test_type;
                    }
                    populate_from_config(&mut state, &doc);
                    form.set_form(state);
                    loaded_config.set(Some(doc));
                    toasts.success("設定を読み込みました");
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("設定の読込に失敗: {}", e).into());
                    alert("設定の読み込みに失敗しました");
                }
            }
        });
    };

    // クリア時は自動補完しない
    let on_clear = move |_: ()| {
        if !confirm("フォームをすべてクリアしますか？") {
            return;
        }
        let mut state = form.snapshot();
        let test_type = state.test_type;
        apply_template(&mut state, test_type);
        form.set_form(state);
        toasts.info("フォームをクリアしました");
    };

    // 比較実行。検証NGはネットワーク呼び出し前にアラートで中断する
    let on_submit = move |_: ()| {
        if is_running.get_untracked() {
            return;
        }
        let state = form.snapshot();
        let mut config = match build_config(&state) {
            Ok(config) => config,
            Err(e) => {
                alert(&e.to_string());
                return;
            }
        };
        if state.comparison_mode == ComparisonMode::Baseline {
            match baseline_block(&state) {
                Ok(block) => config.baseline = Some(block),
                Err(e) => {
                    alert(&e.to_string());
                    return;
                }
            }
        }

        is_running.set(true);
        run_error.set(None);
        results.set(Vec::new());

        spawn_local(async move {
            match api::post_compare(&config).await {
                Ok(data) => {
                    filter.set(StatusFilter::All);
                    search_input.set(String::new());
                    search_term.set(String::new());
                    results.set(data);
                }
                Err(e) => {
                    run_error.set(Some(format!("比較の実行に失敗しました ({})", e)));
                }
            }
            has_run.set(true);
            is_running.set(false);
        });
    };

    view! {
        <div class="container">
            <Header />

            <main class="main-grid">
                <section class="config-panel">
                    <ConfigForm
                        form=form
                        is_running=is_running
                        toasts=toasts
                        on_type_change=on_type_change
                        on_load_config=on_load_config
                        on_clear=on_clear
                        on_submit=on_submit
                    />
                    <BaselinePanel form=form />
                </section>

                <section class="results-panel">
                    <ResultFilters
                        results=results
                        filter=filter
                        search_input=search_input
                        search_term=search_term
                        toasts=toasts
                    />
                    <ResultsPanel
                        results=results
                        run_error=run_error
                        is_running=is_running
                        has_run=has_run
                        filter=filter
                        search_term=search_term
                    />
                </section>
            </main>

            <ToastHost toasts=toasts />
        </div>
    }
}
