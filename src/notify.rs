//! User-visible notifications
//!
//! The engine reports outcomes (saved, import rejected, load failed)
//! through this sink; how they are displayed is the frontend's business.

/// Severity of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Info,
}

/// Sink for user-visible messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: Level, message: &str);
}

/// Routes notifications into the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Success | Level::Info => tracing::info!(?level, "{message}"),
            Level::Error => tracing::warn!(?level, "{message}"),
        }
    }
}

/// Discards every notification. For embedding contexts without a user.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _level: Level, _message: &str) {}
}
