use serde::{Deserialize, Serialize};

pub const TOAST_DURATION_MS: u32 = 5000;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn icon_class(self) -> &'static str {
        match self {
            Severity::Success => "fas fa-check-circle",
            Severity::Error => "fas fa-exclamation-circle",
            Severity::Warning => "fas fa-exclamation-triangle",
            Severity::Info => "fas fa-info-circle",
        }
    }

    pub fn color_var(self) -> &'static str {
        match self {
            Severity::Success => "var(--success-color)",
            Severity::Error => "var(--error-color)",
            Severity::Warning => "var(--warning-color)",
            Severity::Info => "var(--primary-color)",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToastHandle(u64);

/// The single notification slot. A newer toast replaces the visible one, and
/// the auto-dismiss timer of a replaced toast no longer hides anything.
#[derive(Default, Debug)]
pub struct Toaster {
    current: Option<Toast>,
    generation: u64,
}

impl Toaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    pub fn show(&mut self, message: impl Into<String>, severity: Severity) -> ToastHandle {
        self.generation += 1;
        self.current = Some(Toast {
            message: message.into(),
            severity,
        });
        ToastHandle(self.generation)
    }

    /// Called by the auto-dismiss timer. Returns true if the toast was hidden.
    pub fn expire(&mut self, handle: ToastHandle) -> bool {
        if handle.0 != self.generation || self.current.is_none() {
            return false;
        }
        self.current = None;
        true
    }

    pub fn close(&mut self) {
        self.current = None;
    }
}
