//! 全局提示条
//!
//! 状态与过期判断在共享层，这里负责定时隐藏和渲染。

use adminone_shared::ApiError;
use adminone_shared::snackbar::{HIDE_AFTER_MS, SnackbarColor, SnackbarState};
use leptos::prelude::*;

use crate::web::Timeout;

#[derive(Clone, Copy)]
pub struct SnackbarContext {
    state: RwSignal<SnackbarState>,
}

impl SnackbarContext {
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(SnackbarState::new()),
        }
    }

    fn show(&self, message: String, color: SnackbarColor) {
        let mut generation = 0;
        self.state.update(|s| generation = s.show(message, color));
        self.hide_later(generation);
    }

    fn hide_later(&self, generation: u64) {
        let state = self.state;
        if let Some(timer) = Timeout::new(HIDE_AFTER_MS, move || {
            state.update(|s| {
                s.hide(generation);
            });
        }) {
            timer.forget();
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message.into(), SnackbarColor::Success);
    }

    /// 请求失败提示；导航取消的请求被忽略
    pub fn failure(&self, action: &str, err: &ApiError) {
        let mut generation = None;
        self.state.update(|s| generation = s.failure(action, err));
        if let Some(generation) = generation {
            self.hide_later(generation);
        }
    }
}

impl Default for SnackbarContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_snackbar() -> SnackbarContext {
    use_context::<SnackbarContext>().expect("SnackbarContext should be provided")
}

#[component]
pub fn SnackbarHost() -> impl IntoView {
    let snackbar = use_snackbar();
    let current = move || snackbar.state.with(|s| s.current().cloned());

    view! {
        <Show when=move || current().is_some()>
            <div class="toast toast-top toast-end z-50">
                {move || {
                    current()
                        .map(|s| {
                            let class = match s.color {
                                SnackbarColor::Success => "alert alert-success shadow-lg",
                                SnackbarColor::Danger => "alert alert-error shadow-lg",
                            };
                            view! {
                                <div class=class>
                                    <span>{s.message}</span>
                                </div>
                            }
                        })
                }}
            </div>
        </Show>
    }
}
