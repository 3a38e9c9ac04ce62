//! 全局提示条状态
//!
//! 只显示最新一条消息。每次显示分配新的代数，定时隐藏时携带代数，
//! 过期的定时器不会隐藏更新的消息。

use crate::error::ApiError;

/// 提示显示时长（毫秒）
pub const HIDE_AFTER_MS: u32 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnackbarColor {
    Success,
    Danger,
}

impl SnackbarColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnackbarColor::Success => "success",
            SnackbarColor::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snackbar {
    pub message: String,
    pub color: SnackbarColor,
    pub generation: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnackbarState {
    current: Option<Snackbar>,
    generation: u64,
}

impl SnackbarState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 显示消息，返回用于隐藏的代数
    pub fn show(&mut self, message: impl Into<String>, color: SnackbarColor) -> u64 {
        self.generation += 1;
        self.current = Some(Snackbar {
            message: message.into(),
            color,
            generation: self.generation,
        });
        self.generation
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.show(message, SnackbarColor::Success)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.show(message, SnackbarColor::Danger)
    }

    /// 显示请求失败；因导航而取消的请求不提示
    pub fn failure(&mut self, action: &str, err: &ApiError) -> Option<u64> {
        if err.is_aborted() {
            return None;
        }
        Some(self.error(format!("{}: {}", action, err.message())))
    }

    /// 隐藏指定代数的消息；已被替换时不做任何事
    pub fn hide(&mut self, generation: u64) -> bool {
        match &self.current {
            Some(current) if current.generation == generation => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&Snackbar> {
        self.current.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }
}
