//! Display surfaces
//!
//! The page controller writes to these instead of reaching for global page
//! handles. Each surface is injected at construction time.

pub mod console;

use crate::hospitals::SelectionEntry;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Info,
    Failure,
}

/// A one-line notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message: message.into(),
        }
    }
}

/// Text field receiving the resolved location string
pub trait LocationField: Send + Sync {
    fn value(&self) -> String;
    fn set_value(&self, text: &str);
}

/// Button that starts a location request
pub trait TriggerControl: Send + Sync {
    fn set_enabled(&self, enabled: bool);
    fn is_enabled(&self) -> bool;
    fn set_label(&self, label: &str);
    fn label(&self) -> String;
}

/// Selectable list receiving ranked facilities
pub trait SelectionControl: Send + Sync {
    /// Replace every entry at once
    fn replace_entries(&self, entries: Vec<SelectionEntry>);
    fn entries(&self) -> Vec<SelectionEntry>;
}

/// Sink for transient notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Disables a trigger and swaps its label until dropped
///
/// Dropping restores the idle label and re-enables the control, so every
/// exit path of the guarded operation leaves the control usable.
pub struct BusyGuard<'a> {
    control: &'a dyn TriggerControl,
    idle_label: &'a str,
}

impl<'a> BusyGuard<'a> {
    pub fn engage(control: &'a dyn TriggerControl, busy_label: &str, idle_label: &'a str) -> Self {
        control.set_label(busy_label);
        control.set_enabled(false);
        Self {
            control,
            idle_label,
        }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.control.set_label(self.idle_label);
        self.control.set_enabled(true);
    }
}

/// Lock a surface's state, recovering it if a writer panicked mid-update
fn lock<'a, T>(mutex: &'a Mutex<T>, surface: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("{} state was poisoned by a panicked writer; recovering", surface);
        poisoned.into_inner()
    })
}

/// In-memory text field
#[derive(Debug, Default)]
pub struct TextField {
    value: Mutex<String>,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(text: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(text.into()),
        }
    }
}

impl LocationField for TextField {
    fn value(&self) -> String {
        lock(&self.value, "text field").clone()
    }

    fn set_value(&self, text: &str) {
        *lock(&self.value, "text field") = text.to_string();
    }
}

#[derive(Debug)]
struct ButtonState {
    enabled: bool,
    label: String,
}

/// In-memory button
#[derive(Debug)]
pub struct Button {
    state: Mutex<ButtonState>,
    history: Mutex<Vec<String>>,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(ButtonState {
                enabled: true,
                label: label.into(),
            }),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Every label the button has shown, oldest first
    pub fn label_history(&self) -> Vec<String> {
        lock(&self.history, "button history").clone()
    }
}

impl TriggerControl for Button {
    fn set_enabled(&self, enabled: bool) {
        lock(&self.state, "button").enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        lock(&self.state, "button").enabled
    }

    fn set_label(&self, label: &str) {
        lock(&self.state, "button").label = label.to_string();
        lock(&self.history, "button history").push(label.to_string());
    }

    fn label(&self) -> String {
        lock(&self.state, "button").label.clone()
    }
}

/// In-memory selection list
#[derive(Debug, Default)]
pub struct OptionList {
    entries: Mutex<Vec<SelectionEntry>>,
}

impl OptionList {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionControl for OptionList {
    fn replace_entries(&self, entries: Vec<SelectionEntry>) {
        *lock(&self.entries, "option list") = entries;
    }

    fn entries(&self) -> Vec<SelectionEntry> {
        lock(&self.entries, "option list").clone()
    }
}

/// Notifier that keeps every notice
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.notices, "notifier").clone()
    }

    pub fn last(&self) -> Option<Notice> {
        lock(&self.notices, "notifier").last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        lock(&self.notices, "notifier").push(notice);
    }
}
