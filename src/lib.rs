//! # Markdown Session
//!
//! Headless session engine for a live markdown editor: document text,
//! bounded undo/redo history, debounced autosave, formatting commands,
//! and derived cursor/statistics state. Rendering, routing, and
//! authentication are left entirely to the embedding frontend.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Instant;
//! use markdown_session::prelude::*;
//!
//! # async fn run() -> Result<(), SessionError> {
//! let store = Arc::new(MemoryStore::new());
//! let mut session = EditorSession::new(
//!     SessionConfig::new("doc-1", "user-key"),
//!     store,
//!     Arc::new(LogNotifier),
//! );
//!
//! session.update("# Hello");
//! session.set_selection(2, 7);
//! session.format(Format::Bold);
//!
//! // the caller owns the event loop: sleep until the deadline, then tick
//! if let Some(deadline) = session.autosave_deadline() {
//!     tokio::time::sleep_until(deadline.into()).await;
//!     session.autosave_tick(Instant::now()).await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod autosave;
pub mod cursor;
pub mod format;
pub mod history;
pub mod keymap;
pub mod notify;
pub mod session;
pub mod settings;
pub mod stats;
pub mod store;

pub mod prelude {
    //! Convenient re-exports for common usage
    pub use crate::autosave::AutoSave;
    pub use crate::cursor::Position;
    pub use crate::format::{CursorHint, Format, FormatResult};
    pub use crate::history::SnapshotHistory;
    pub use crate::keymap::{resolve, EditorAction, KeyChord};
    pub use crate::notify::{Level, LogNotifier, Notifier, NullNotifier};
    pub use crate::session::{EditorSession, Selection, SessionError};
    pub use crate::settings::{SessionConfig, SessionSettings};
    pub use crate::stats::TextStats;
    pub use crate::store::{
        DocumentMeta, DocumentStore, FileStore, MemoryStore, StoreError,
    };
}
