//! トースト通知
//!
//! 約3秒で自動的に消える通知。成功とエラーで色分けする。

use leptos::leptos_dom::helpers::set_timeout;
use leptos::prelude::*;
use std::time::Duration;

const TOAST_DURATION_MS: u64 = 3000;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "toast success",
            ToastKind::Error => "toast error",
            ToastKind::Info => "toast info",
        }
    }
}

#[derive(Clone)]
pub struct Toast {
    pub id: u32,
    pub message: String,
    pub kind: ToastKind,
}

/// トーストの発行口。Copyなのでどのハンドラにも渡せる
#[derive(Clone, Copy)]
pub struct Toasts {
    list: RwSignal<Vec<Toast>>,
    next_id: RwSignal<u32>,
}

impl Toasts {
    pub fn new() -> Self {
        Self {
            list: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(0),
        }
    }

    pub fn show(&self, message: impl Into<String>, kind: ToastKind) {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        self.list.update(|list| {
            list.push(Toast {
                id,
                message: message.into(),
                kind,
            })
        });

        let list = self.list;
        set_timeout(
            move || list.update(|l| l.retain(|toast| toast.id != id)),
            Duration::from_millis(TOAST_DURATION_MS),
        );
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Error);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(message, ToastKind::Info);
    }
}

#[component]
pub fn ToastHost(toasts: Toasts) -> impl IntoView {
    view! {
        <div id="toast-container">
            <For
                each=move || toasts.list.get()
                key=|toast| toast.id
                children=move |toast| {
                    view! { <div class=toast.kind.class()>{toast.message.clone()}</div> }
                }
            />
        </div>
    }
}
