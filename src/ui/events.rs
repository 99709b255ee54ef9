//! Event rendering
//!
//! Prints engine events either as NDJSON (one object per line) or as short
//! human-readable lines prefixed with a timestamp.

use synec::{SyncEvent, SyncEventSink};

pub struct EventPrinter {
    json: bool,
}

impl EventPrinter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl SyncEventSink for EventPrinter {
    fn on_event(&self, event: SyncEvent) {
        if self.json {
            println!("{}", event.to_json());
            return;
        }

        let rendered = render_event(&event);
        match event {
            SyncEvent::InstallFailed { .. } | SyncEvent::SyncError { .. } => {
                eprintln!("{} {rendered}", timestamp())
            }
            _ => println!("{} {rendered}", timestamp()),
        }
    }
}

/// Local wall-clock `HH:MM:SS`
fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

pub fn render_event(event: &SyncEvent) -> String {
    match event {
        SyncEvent::PackageInvalid { path } => {
            format!("⚠ {path}: package.json needs a name and a version, skipped")
        }
        SyncEvent::InstallStarted { packages } => format!("📦 Installing {packages} package(s)..."),
        SyncEvent::InstallSkipped { packages } => format!("✓ {packages} package(s) up to date"),
        SyncEvent::InstallComplete { packages } => format!("✓ Installed {packages} package(s)"),
        SyncEvent::InstallFailed { message } => format!("✗ Install failed: {message}"),
        SyncEvent::ScriptStarted { package, command } => format!("▶ {package}: {command}"),
        SyncEvent::ScriptOutput { package, line } => format!("  [{package}] {line}"),
        SyncEvent::WatchStarted { package, source } => format!("📂 Watching {package} ({source})"),
        SyncEvent::FileCopied { package, path } => format!("📝 {package}/{path}"),
        SyncEvent::FileRemoved { package, path } => format!("🗑 {package}/{path}"),
        SyncEvent::RemovalSuppressed { package, path } => {
            format!("⏸ {package}/{path} removal held back while building")
        }
        SyncEvent::SyncError { package, message } => format!("✗ {package}: {message}"),
        SyncEvent::Shutdown => "👋 Shutting down...".to_string(),
    }
}
