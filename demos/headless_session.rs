//! Drives a session end to end without any frontend: type, format,
//! let the autosave deadline pass, then reopen the document.
//!
//! ```sh
//! cargo run --example headless_session
//! ```

use std::sync::Arc;
use std::time::Instant;

use markdown_session::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let store = Arc::new(MemoryStore::new());

    let settings = SessionSettings {
        autosave_delay_ms: 200, // short enough to watch it happen
        ..SessionSettings::default()
    };
    let config = SessionConfig::new("demo-doc", "demo-user").with_settings(settings);

    let mut session = EditorSession::new(config.clone(), store.clone(), Arc::new(LogNotifier));

    session.update("The quick brown fox");
    session.set_title("Fox Notes");

    // make "quick" bold
    session.set_selection(4, 9);
    session.format(Format::Bold);
    println!("text:      {}", session.text());
    println!("selection: {:?}", session.selection());
    println!("cursor:    {:?}", session.cursor_position());
    println!("stats:     {:?}", session.stats());

    // the caller owns the event loop: sleep until the deadline, then tick
    if let Some(deadline) = session.autosave_deadline() {
        tokio::time::sleep_until(deadline.into()).await;
        session.autosave_tick(Instant::now()).await;
    }
    println!("dirty after autosave: {}", session.is_dirty());
    println!("store saves:          {}", store.save_count());

    session.close();

    // a second session sees what the first one persisted
    let reopened = EditorSession::open(config, store, Arc::new(LogNotifier)).await;
    println!("reopened:  {} ({:?})", reopened.title(), reopened.text());

    let (bytes, filename) = reopened.export();
    println!("export:    {} ({} bytes)", filename, bytes.len());
}
