//! Terminal notifier

use crate::ui::{Notice, NoticeKind, Notifier};
use tracing::debug;

/// Prints notices to stderr and mirrors them to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Failure => {
                debug!(kind = "failure", "{}", notice.message);
                eprintln!("Error: {}", notice.message);
            }
            NoticeKind::Success | NoticeKind::Info => {
                debug!(kind = "notice", "{}", notice.message);
                eprintln!("{}", notice.message);
            }
        }
    }
}
