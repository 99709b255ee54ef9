//! Script Runner
//!
//! Runs the build or watch script of each source package before it is
//! installed, so the installed copy contains built output.
//!
//! - build mode: `npm run build`, blocking
//! - watch mode: `npm run watch` (or `npm start`) in the background; a
//!   regular build runs first when the entry point has not been built yet
//!
//! Launching a watch script arms removal protection, because watch builds
//! usually start by cleaning their output directory.

use std::borrow::Cow;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};
use std::sync::Mutex;

use crate::domain::entities::PackageDescriptor;
use crate::domain::ports::{SyncEvent, SyncEventSink};
use crate::domain::value_objects::normalize_entry_point;
use crate::error::{SyncError, SyncResult};
use crate::infrastructure::NpmInstaller;

use super::context::SyncContext;

/// Lockfile whose absence means dependencies were never installed
const PACKAGE_LOCK: &str = "package-lock.json";

/// Background script of one package; killed on `stop()` or drop.
pub struct ScriptHandle {
    package: String,
    command: String,
    child: Mutex<Option<Child>>,
}

impl ScriptHandle {
    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn is_running(&self) -> bool {
        let mut child = self.child.lock().unwrap_or_else(|e| e.into_inner());
        match child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    pub fn stop(&self) {
        let Some(mut child) = self.child.lock().unwrap_or_else(|e| e.into_inner()).take() else {
            return;
        };
        if let Err(e) = child.kill() {
            tracing::debug!(package = %self.package, error = %e, "script already exited");
        }
        let _ = child.wait();
        tracing::info!(package = %self.package, command = %self.command, "stopped script");
    }
}

impl Drop for ScriptHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct ScriptRunner {
    ctx: SyncContext,
    npm: NpmInstaller,
}

impl ScriptRunner {
    pub fn new(ctx: SyncContext, npm: NpmInstaller) -> Self {
        Self { ctx, npm }
    }

    /// Run the scripts of every package. In watch mode the returned handles
    /// keep the background scripts alive.
    pub fn run(&self, package_paths: &[PathBuf], watch: bool) -> Vec<ScriptHandle> {
        let mut handles = Vec::new();

        for path in package_paths {
            let descriptor = self.ctx.descriptor(path);
            let Some(script) = select_script(&descriptor, watch) else {
                tracing::debug!(path = %path.display(), "no script to run");
                continue;
            };
            let package = descriptor.name().unwrap_or("<unnamed>").to_string();
            let dir = self.ctx.source_dir(path);

            if let Err(e) = self.ensure_dependencies(&dir) {
                tracing::warn!(package = %package, error = %e, "installing package dependencies failed");
            }

            if !watch {
                if let Err(e) = self.build(&package, &dir) {
                    tracing::warn!(package = %package, error = %e, "build failed");
                }
                continue;
            }

            if entry_point_missing(&descriptor, &dir) {
                if descriptor.script("build").is_some() {
                    tracing::info!(package = %package, "entry point missing, running a regular build first");
                    if let Err(e) = self.build(&package, &dir) {
                        tracing::warn!(package = %package, error = %e, "build failed");
                    }
                } else {
                    tracing::warn!(package = %package, "entry point missing and no build script found");
                }
            }

            match self.spawn_watch(&package, &dir, script) {
                Ok(handle) => handles.push(handle),
                Err(e) => tracing::warn!(package = %package, error = %e, "watch script failed to start"),
            }
        }

        handles
    }

    /// Install the dependencies of the package in `dir` when they are
    /// missing. Returns whether an install ran.
    pub fn ensure_dependencies(&self, dir: &Path) -> SyncResult<bool> {
        let has_modules = dir.join(self.ctx.layout.dependency_dir_name()).is_dir();
        let has_lock = dir.join(PACKAGE_LOCK).is_file();
        if has_modules && has_lock {
            return Ok(false);
        }

        tracing::info!(dir = %dir.display(), "dependencies not installed, installing");
        let output = self
            .npm
            .command(dir, ["install"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| script_error(dir, "install", e.to_string()))?;

        if !output.status.success() {
            return Err(script_error(
                dir,
                "install",
                format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }
        Ok(true)
    }

    /// `npm run build`, blocking. Output is relayed as script lines.
    fn build(&self, package: &str, dir: &Path) -> SyncResult<()> {
        let command = "npm run build";
        self.ctx.emit(SyncEvent::ScriptStarted {
            package: package.to_string(),
            command: command.to_string(),
        });

        let mut child = self
            .npm
            .command(dir, ["run", "build"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| script_error(dir, "build", e.to_string()))?;

        if let Some(stdout) = child.stdout.take() {
            relay_output(stdout, package, self.ctx.events.as_ref());
        }

        let status = child
            .wait()
            .map_err(|e| script_error(dir, "build", e.to_string()))?;
        if !status.success() {
            return Err(script_error(dir, "build", status.to_string()));
        }
        Ok(())
    }

    fn spawn_watch(&self, package: &str, dir: &Path, script: &str) -> SyncResult<ScriptHandle> {
        let args: &[&str] = if script == "watch" {
            &["run", "watch"]
        } else {
            &["start"]
        };
        let command = format!("npm {}", args.join(" "));

        tracing::info!(package, command = %command, "watching in background");
        self.ctx.emit(SyncEvent::ScriptStarted {
            package: package.to_string(),
            command: command.clone(),
        });

        let mut child = self
            .npm
            .command(dir, args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| script_error(dir, script, e.to_string()))?;

        self.ctx.protection.arm();

        if let Some(stdout) = child.stdout.take() {
            let events = self.ctx.events.clone();
            let package = package.to_string();
            spawn_relay(move || relay_output(stdout, &package, events.as_ref()));
        }
        if let Some(stderr) = child.stderr.take() {
            let package = package.to_string();
            spawn_relay(move || {
                for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                    if !line.trim().is_empty() {
                        tracing::warn!(package = %package, "{}", strip_ansi(&line));
                    }
                }
            });
        }

        Ok(ScriptHandle {
            package: package.to_string(),
            command,
            child: Mutex::new(Some(child)),
        })
    }
}

/// The script a package runs in the given mode, by name
fn select_script(descriptor: &PackageDescriptor, watch: bool) -> Option<&'static str> {
    let candidates: &[&'static str] = if watch { &["watch", "start"] } else { &["build"] };
    candidates
        .iter()
        .copied()
        .find(|name| descriptor.script(name).is_some())
}

fn entry_point_missing(descriptor: &PackageDescriptor, dir: &Path) -> bool {
    descriptor
        .main
        .as_deref()
        .and_then(normalize_entry_point)
        .is_some_and(|main| !dir.join(main).exists())
}

fn script_error(dir: &Path, script: &str, message: String) -> SyncError {
    SyncError::ScriptFailed {
        path: dir.to_path_buf(),
        script: script.to_string(),
        message,
    }
}

/// Relay threads end when the script closes its output; they are never
/// joined because grandchildren may hold the pipe open.
fn spawn_relay(f: impl FnOnce() + Send + 'static) {
    if let Err(e) = std::thread::Builder::new()
        .name("synec-script-output".to_string())
        .spawn(f)
    {
        tracing::warn!(error = %e, "script output will not be shown");
    }
}

fn relay_output(output: impl Read, package: &str, events: &dyn SyncEventSink) {
    for line in BufReader::new(output).lines().map_while(Result::ok) {
        let line = strip_ansi(&line);
        if line.trim().is_empty() {
            continue;
        }
        events.on_event(SyncEvent::ScriptOutput {
            package: package.to_string(),
            line: line.into_owned(),
        });
    }
}

/// Remove terminal escape sequences (colors, cursor movement, screen
/// clearing) so script output can't garble our own.
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\u{1b}') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\u{1b}' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            // CSI: ESC [ params <final byte @..~>
            Some('[') => {
                chars.next();
                for next in chars.by_ref() {
                    if ('@'..='~').contains(&next) {
                        break;
                    }
                }
            }
            // OSC: ESC ] ... terminated by BEL or ESC \
            Some(']') => {
                chars.next();
                while let Some(next) = chars.next() {
                    if next == '\u{7}' {
                        break;
                    }
                    if next == '\u{1b}' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            // Two-character sequences such as ESC c (reset)
            Some(_) => {
                chars.next();
            }
            None => {}
        }
    }

    Cow::Owned(out)
}
