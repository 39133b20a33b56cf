//! The editor session
//!
//! Owns the document text, title, and selection, and funnels every
//! mutation through the history, autosave, and statistics components.
//! Collaborators (the document store and the notification sink) are
//! passed in at construction; the session never reaches into ambient
//! state.
//!
//! The session is single-threaded and `&mut`-driven. The only suspension
//! points are the store call and the caller's sleep until
//! [`EditorSession::autosave_deadline`]; everything else is synchronous.

use std::sync::Arc;
use std::time::Instant;

use ropey::Rope;
use thiserror::Error;

use crate::autosave::AutoSave;
use crate::cursor::{self, Position};
use crate::format::{CursorHint, Format};
use crate::history::SnapshotHistory;
use crate::keymap::EditorAction;
use crate::notify::{Level, Notifier};
use crate::settings::SessionConfig;
use crate::stats::{StatsCache, TextStats};
use crate::store::{DocumentMeta, DocumentStore, StoreError};

/// Document shown when a load fails; the session stays usable.
const LOAD_ERROR_TEXT: &str = "Error loading file content.";

/// A selection span in char offsets. `start == end` is a caret.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    fn ordered(&self) -> (usize, usize) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }
}

/// Failures surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to persist document")]
    Persist(#[from] StoreError),

    #[error("unsupported import {name:?} ({media_type:?})")]
    UnsupportedImport { name: String, media_type: String },
}

/// An open document being edited.
pub struct EditorSession {
    config: SessionConfig,
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,

    text: Rope,
    title: String,
    /// Title as of the last successful save
    persisted_title: String,
    selection: Selection,
    /// Bumped on every text mutation; drives change detection downstream
    content_version: u64,

    history: SnapshotHistory,
    autosave: AutoSave,
    stats_cache: StatsCache,

    /// Guards against overlapping store calls
    in_flight: bool,
    closed: bool,
}

impl EditorSession {
    /// Create a session over a fresh, empty document.
    pub fn new(
        config: SessionConfig,
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let text = Rope::new();
        let title = config.settings.default_title.clone();
        Self {
            history: SnapshotHistory::new(text.clone(), config.settings.history_limit),
            autosave: AutoSave::new(config.settings.autosave_delay(), Instant::now()),
            stats_cache: StatsCache::new(),
            text,
            persisted_title: title.clone(),
            title,
            selection: Selection::default(),
            content_version: 0,
            in_flight: false,
            closed: false,
            config,
            store,
            notifier,
        }
    }

    /// Create a session by loading the configured document from the store.
    ///
    /// A failed load never fails the session: the document becomes a
    /// placeholder error text, the user is notified, and nothing enters
    /// history or dirties the session.
    pub async fn open(
        config: SessionConfig,
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let mut session = Self::new(config, store, notifier);

        let loaded = match session.store.load(&session.config.file_id).await {
            Ok((bytes, name)) => match String::from_utf8(bytes) {
                Ok(content) => Some((content, name)),
                Err(_) => {
                    tracing::error!(id = %session.config.file_id, "loaded document is not utf-8");
                    None
                }
            },
            Err(e) => {
                tracing::error!(id = %session.config.file_id, error = %e, "load failed");
                None
            }
        };

        match loaded {
            Some((content, name)) => {
                session.replace_text(Rope::from_str(&content));
                // the load itself is undoable, back to the empty document
                session.history.push(&session.text);
                session.title = name.clone();
                session.persisted_title = name;
            }
            None => {
                session.replace_text(Rope::from_str(LOAD_ERROR_TEXT));
                session.notifier.notify(Level::Error, "Failed to load file");
            }
        }
        session
    }

    // ===== Mutations =====

    /// Replace the document text, as typing in the editor pane does.
    ///
    /// Pushes into history and marks the session dirty.
    pub fn update(&mut self, new_text: &str) {
        self.replace_text(Rope::from_str(new_text));
        self.history.push(&self.text);
        self.autosave.mark_dirty(Instant::now());
    }

    /// Rename the document. Blank titles fall back to the configured
    /// default; the session only becomes dirty when the result differs
    /// from the last persisted title.
    pub fn set_title(&mut self, new_title: &str) {
        let trimmed = new_title.trim();
        let sanitized = if trimmed.is_empty() {
            self.config.settings.default_title.clone()
        } else {
            trimmed.to_string()
        };
        let diverged = sanitized != self.persisted_title;
        self.title = sanitized;
        if diverged {
            self.autosave.mark_dirty(Instant::now());
        }
    }

    /// Move the selection. Offsets are clamped to the text length.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.text.len_chars();
        self.selection = Selection {
            start: start.min(len),
            end: end.min(len),
        };
    }

    /// Apply a formatting command to the current selection.
    ///
    /// The replacement is spliced in at the selection bounds, history and
    /// dirty tracking behave as for [`update`](Self::update), and the
    /// engine's cursor hint decides where the caret lands.
    pub fn format(&mut self, format: Format) {
        let (start, end) = self.selection.ordered();
        let selected = self.text.slice(start..end).to_string();
        let result = format.apply(&selected);

        self.text.remove(start..end);
        self.text.insert(start, &result.insert);
        self.content_version += 1;
        self.history.push(&self.text);
        self.autosave.mark_dirty(Instant::now());

        self.selection = match result.cursor {
            CursorHint::After => Selection::caret(start + result.insert.chars().count()),
            CursorHint::Select {
                start: hint_start,
                len,
            } => Selection {
                start: start + hint_start,
                end: start + hint_start + len,
            },
        };
    }

    /// Step back one snapshot. Does not mark dirty on its own; dirtiness
    /// is driven by the edits that diverged from the last save.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(text) => {
                self.replace_text(text);
                true
            }
            None => false,
        }
    }

    /// Step forward one snapshot.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(text) => {
                self.replace_text(text);
                true
            }
            None => false,
        }
    }

    // ===== Persistence =====

    /// Manually save the document.
    ///
    /// A no-op on a closed session or while another save is in flight. On
    /// failure the user is notified, the error is returned, and the
    /// session stays dirty.
    pub async fn save(&mut self) -> Result<(), SessionError> {
        match self.persist().await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.notifier.notify(Level::Error, "Failed to save file");
                Err(e)
            }
        }
    }

    /// Drive the autosave scheduler.
    ///
    /// Call when the event loop reaches
    /// [`autosave_deadline`](Self::autosave_deadline). Returns whether a
    /// save was attempted.
    /// A failed autosave is logged, not raised: the session stays dirty
    /// and nothing re-arms until a new clean-to-dirty transition or a manual
    /// save.
    pub async fn autosave_tick(&mut self, now: Instant) -> bool {
        if self.closed || !self.autosave.fire(now) {
            return false;
        }
        if let Err(e) = self.persist().await {
            tracing::error!(error = %e, "auto-save failed");
        }
        true
    }

    /// The armed autosave deadline, if any. The owning event loop sleeps
    /// until this instant and then calls [`autosave_tick`](Self::autosave_tick).
    pub fn autosave_deadline(&self) -> Option<Instant> {
        if self.closed {
            None
        } else {
            self.autosave.deadline()
        }
    }

    async fn persist(&mut self) -> Result<(), SessionError> {
        if self.closed || self.in_flight {
            return Ok(());
        }
        self.in_flight = true;
        let meta = DocumentMeta {
            id: self.config.file_id.clone(),
            name: self.title.clone(),
            owner_key: self.config.owner_key.clone(),
        };
        let bytes = self.text.to_string().into_bytes();
        let result = self.store.save(&bytes, &meta).await;
        self.in_flight = false;

        // a save that outlives the session completes, but its result is
        // discarded
        if self.closed {
            return Ok(());
        }
        match result {
            Ok(()) => {
                self.autosave.mark_clean(Instant::now());
                self.persisted_title = self.title.clone();
                self.notifier.notify(Level::Success, "File saved successfully");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    // ===== Import / export =====

    /// Replace the document with imported content.
    ///
    /// Accepts markdown or plain text (by media type, or a `.md` name).
    /// Anything else, including non-UTF-8 payloads, is rejected before
    /// any mutation. The title is derived from the source name minus its
    /// extension.
    pub fn import(
        &mut self,
        raw: &[u8],
        source_name: &str,
        media_type: &str,
    ) -> Result<(), SessionError> {
        let accepted = media_type == "text/markdown"
            || media_type == "text/plain"
            || source_name.ends_with(".md");
        let content = if accepted {
            std::str::from_utf8(raw).ok()
        } else {
            None
        };
        let Some(content) = content else {
            self.notifier
                .notify(Level::Error, "Please select a valid markdown file");
            return Err(SessionError::UnsupportedImport {
                name: source_name.to_string(),
                media_type: media_type.to_string(),
            });
        };

        self.update(content);
        self.set_title(strip_extension(source_name));
        self.notifier
            .notify(Level::Success, "File imported successfully!");
        Ok(())
    }

    /// The document body plus a download filename derived from the title.
    pub fn export(&self) -> (Vec<u8>, String) {
        let stem: String = self
            .title
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect();
        self.notifier
            .notify(Level::Success, "File downloaded successfully!");
        (self.text.to_string().into_bytes(), format!("{stem}.md"))
    }

    // ===== Commands and teardown =====

    /// Execute a resolved keyboard action.
    pub async fn dispatch(&mut self, action: EditorAction) -> Result<(), SessionError> {
        match action {
            EditorAction::Format(format) => {
                self.format(format);
                Ok(())
            }
            EditorAction::Undo => {
                self.undo();
                Ok(())
            }
            EditorAction::Redo => {
                self.redo();
                Ok(())
            }
            EditorAction::Save => self.save().await,
        }
    }

    /// Tear the session down: the timer is cancelled and every later save
    /// or timer callback becomes a no-op.
    pub fn close(&mut self) {
        self.closed = true;
        self.autosave.cancel();
    }

    // ===== Derived state and accessors =====

    /// Line/column of the selection start.
    pub fn cursor_position(&self) -> Position {
        cursor::locate(&self.text, self.selection.start)
    }

    /// Word/char statistics, memoized on the content version.
    pub fn stats(&mut self) -> TextStats {
        self.stats_cache.get(&self.text, self.content_version)
    }

    pub fn text(&self) -> &Rope {
        &self.text
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_dirty(&self) -> bool {
        self.autosave.dirty()
    }

    pub fn last_saved(&self) -> Instant {
        self.autosave.last_saved()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn content_version(&self) -> u64 {
        self.content_version
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn replace_text(&mut self, text: Rope) {
        self.text = text;
        self.content_version += 1;
        let len = self.text.len_chars();
        self.selection = Selection {
            start: self.selection.start.min(len),
            end: self.selection.end.min(len),
        };
    }
}

/// Drop the final `.ext` segment of a file name, if there is one.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => {
            let ext = &name[idx + 1..];
            if !ext.is_empty() && !ext.contains('/') {
                &name[..idx]
            } else {
                name
            }
        }
        None => name,
    }
}
