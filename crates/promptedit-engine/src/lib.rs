use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use promptedit_contracts::events::EventWriter;
use promptedit_contracts::plan::{build_plan, PromptPlan, SeedValue};
use promptedit_contracts::tools::{
    build_filter_options, resolve_canonical_name, FilterKind, FilterOptions, ToolRangeTable,
};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};

mod bridge;
mod dryrun;

pub use bridge::{EditorBridge, MountGuard};
pub use dryrun::DryrunEditor;

pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(200);

const ERROR_TEXT_MAX_CHARS: usize = 240;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub sha256: String,
}

/// Control surface of the canvas editor. Implementations own their state
/// behind `&self` so a handle can sit in an [`EditorBridge`].
pub trait FilterEditor: Send + Sync {
    fn name(&self) -> &str;
    fn load_image(&self, path: &Path) -> Result<LoadedImage>;
    /// May fail with a message containing "locked" while the editor is busy.
    fn apply_filter(&self, filter: &str, options: &FilterOptions) -> Result<()>;
    fn remove_filter(&self, filter: &str) -> Result<()>;
    fn to_data_url(&self) -> Result<String>;
    fn resize_ui(&self, width: u32, height: u32) -> Result<()>;
    fn activate_menu(&self, menu: &str) -> Result<()>;
}

pub type EditorHandle = Arc<dyn FilterEditor>;

#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    Applied { filter: &'static str, attempts: u8 },
    Removed { filter: &'static str },
    Unresolved { tool: String },
    /// The tool takes a value, so it cannot be switched on without one.
    NotToggle { filter: &'static str },
    NoEditor,
    Failed { filter: &'static str, error: String },
}

impl ApplyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ApplyOutcome::Applied { .. } | ApplyOutcome::Removed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub retry_delay: Duration,
    pub events_path: Option<PathBuf>,
    pub tool_ranges_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retry_delay: DEFAULT_RETRY_DELAY,
            events_path: None,
            tool_ranges_path: None,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `PROMPTEDIT_RETRY_DELAY_MS`, `PROMPTEDIT_EVENTS`
    /// and `PROMPTEDIT_TOOL_RANGES` (falling back to
    /// `$HOME/.promptedit/tool_ranges.json`).
    pub fn from_env() -> Self {
        Self::from_lookup(non_empty_env)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let retry_delay = lookup("PROMPTEDIT_RETRY_DELAY_MS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_RETRY_DELAY);
        Self {
            retry_delay,
            events_path: lookup("PROMPTEDIT_EVENTS").map(PathBuf::from),
            tool_ranges_path: lookup("PROMPTEDIT_TOOL_RANGES")
                .map(PathBuf::from)
                .or_else(|| tool_ranges_override_path(lookup("HOME"))),
        }
    }
}

/// Turns tool names and slider values into editor filter calls.
///
/// Never returns an error: unknown tools, a missing editor and editor
/// failures are logged as events and reported through [`ApplyOutcome`].
#[derive(Debug, Clone)]
pub struct ToolApplier {
    bridge: EditorBridge,
    events: EventWriter,
    retry_delay: Duration,
}

impl ToolApplier {
    pub fn new(bridge: EditorBridge, events: EventWriter, retry_delay: Duration) -> Self {
        Self {
            bridge,
            events,
            retry_delay,
        }
    }

    /// A "locked" editor is retried once after `retry_delay`. The wait blocks
    /// the calling thread rather than resuming on a timer.
    pub fn apply_tool(&self, tool: &str, raw_value: f64) -> ApplyOutcome {
        let Some(kind) = self.resolve(tool) else {
            return ApplyOutcome::Unresolved {
                tool: tool.to_string(),
            };
        };
        self.apply_kind(tool, kind, raw_value)
    }

    /// Checkbox semantics: on applies a parameterless filter, off removes any
    /// filter. Switching on a filter that takes a value is refused.
    pub fn set_tool_enabled(&self, tool: &str, enabled: bool) -> ApplyOutcome {
        if !enabled {
            return self.remove_tool(tool);
        }
        let Some(kind) = self.resolve(tool) else {
            return ApplyOutcome::Unresolved {
                tool: tool.to_string(),
            };
        };
        if !kind.is_toggle() {
            let filter = kind.identifier();
            self.log(
                "tool_not_toggle",
                json!({
                    "tool": tool,
                    "filter": filter,
                    "warning": format!("Tool needs a value: {tool}"),
                }),
            );
            return ApplyOutcome::NotToggle { filter };
        }
        self.apply_kind(tool, kind, 0.0)
    }

    fn apply_kind(&self, tool: &str, kind: FilterKind, raw_value: f64) -> ApplyOutcome {
        let options = build_filter_options(kind, raw_value);
        let filter = kind.identifier();
        let outcome = self.call_with_retry(filter, |editor| editor.apply_filter(filter, &options));
        if let ApplyOutcome::Applied { attempts, .. } = outcome {
            self.log(
                "filter_applied",
                json!({
                    "tool": tool,
                    "filter": filter,
                    "raw_value": finite_or_null(raw_value),
                    "options": options,
                    "attempts": attempts,
                }),
            );
        }
        outcome
    }

    pub fn remove_tool(&self, tool: &str) -> ApplyOutcome {
        let Some(kind) = self.resolve(tool) else {
            return ApplyOutcome::Unresolved {
                tool: tool.to_string(),
            };
        };
        let filter = kind.identifier();
        let outcome = match self.call_with_retry(filter, |editor| editor.remove_filter(filter)) {
            ApplyOutcome::Applied { .. } => ApplyOutcome::Removed { filter },
            other => other,
        };
        if outcome.is_success() {
            self.log("filter_removed", json!({ "tool": tool, "filter": filter }));
        }
        outcome
    }

    fn resolve(&self, tool: &str) -> Option<FilterKind> {
        let kind = resolve_canonical_name(tool);
        if kind.is_none() {
            self.log(
                "tool_unresolved",
                json!({ "tool": tool, "warning": format!("No mapping found for tool: {tool}") }),
            );
        }
        kind
    }

    // One retry after `retry_delay` when the editor reports itself locked. The
    // handle is re-read from the bridge before retrying, so an editor that was
    // unmounted in the meantime is not called.
    fn call_with_retry<F>(&self, filter: &'static str, call: F) -> ApplyOutcome
    where
        F: Fn(&dyn FilterEditor) -> Result<()>,
    {
        let Some(editor) = self.bridge.get() else {
            self.log("editor_missing", json!({ "filter": filter }));
            return ApplyOutcome::NoEditor;
        };
        let err = match call(editor.as_ref()) {
            Ok(()) => return ApplyOutcome::Applied { filter, attempts: 1 },
            Err(err) => err,
        };
        if !is_locked_error(&err) {
            return self.failed(filter, &err, 1);
        }
        drop(editor);

        self.log(
            "filter_retry",
            json!({
                "filter": filter,
                "delay_ms": self.retry_delay.as_millis() as u64,
                "error": error_chain_text(&err, ERROR_TEXT_MAX_CHARS),
            }),
        );
        thread::sleep(self.retry_delay);

        let Some(editor) = self.bridge.get() else {
            self.log("editor_missing", json!({ "filter": filter, "attempt": 2 }));
            return ApplyOutcome::NoEditor;
        };
        match call(editor.as_ref()) {
            Ok(()) => ApplyOutcome::Applied { filter, attempts: 2 },
            Err(err) => self.failed(filter, &err, 2),
        }
    }

    fn failed(&self, filter: &'static str, err: &anyhow::Error, attempts: u8) -> ApplyOutcome {
        let error = error_chain_text(err, ERROR_TEXT_MAX_CHARS);
        self.log(
            "filter_failed",
            json!({ "filter": filter, "attempts": attempts, "error": error }),
        );
        ApplyOutcome::Failed { filter, error }
    }

    fn log(&self, event_type: &str, payload: Value) {
        // Event write failures are dropped here.
        let _ = self.events.emit(event_type, map_object(payload));
    }
}

/// One editing session: a bridge for the mounted editor, the activity log,
/// slider ranges and the most recent plan.
pub struct EditSession {
    session_id: String,
    events: EventWriter,
    bridge: EditorBridge,
    applier: ToolApplier,
    ranges: ToolRangeTable,
    last_plan: Option<PromptPlan>,
}

impl EditSession {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let session_id = format!("session-{}", uuid::Uuid::new_v4());
        let events = match &config.events_path {
            Some(path) => EventWriter::new(path, session_id.clone()),
            None => EventWriter::in_memory(session_id.clone()),
        };
        let bridge = EditorBridge::new();
        let applier = ToolApplier::new(bridge.clone(), events.clone(), config.retry_delay);
        let ranges = load_tool_ranges(config.tool_ranges_path.as_deref());

        events.emit(
            "session_started",
            map_object(json!({
                "retry_delay_ms": config.retry_delay.as_millis() as u64,
                "tool_ranges": ranges.len(),
            })),
        )?;

        Ok(Self {
            session_id,
            events,
            bridge,
            applier,
            ranges,
            last_plan: None,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn bridge(&self) -> EditorBridge {
        self.bridge.clone()
    }

    pub fn ranges(&self) -> &ToolRangeTable {
        &self.ranges
    }

    pub fn mount(&self, editor: EditorHandle) -> MountGuard {
        self.bridge.mount(editor)
    }

    pub fn plan(&mut self, prompt: &str) -> Result<Option<PromptPlan>> {
        let Some(plan) = build_plan(prompt) else {
            return Ok(None);
        };
        self.events.emit(
            "plan_built",
            map_object(json!({
                "prompt": plan.prompt,
                "tools": plan.tool_names(),
            })),
        )?;
        self.last_plan = Some(plan.clone());
        Ok(Some(plan))
    }

    pub fn last_plan(&self) -> Option<&PromptPlan> {
        self.last_plan.as_ref()
    }

    pub fn apply_tool(&self, tool: &str, raw_value: f64) -> ApplyOutcome {
        self.applier.apply_tool(tool, raw_value)
    }

    pub fn set_tool_enabled(&self, tool: &str, enabled: bool) -> ApplyOutcome {
        self.applier.set_tool_enabled(tool, enabled)
    }

    /// Applies every suggestion at its seed value. Suggestions without a
    /// usable seed are skipped.
    pub fn apply_plan(&self, plan: &PromptPlan) -> Vec<(String, ApplyOutcome)> {
        plan.tools
            .iter()
            .filter_map(|suggestion| {
                let outcome = match suggestion.seed_value()? {
                    SeedValue::Number(value) => self.apply_tool(&suggestion.name, value),
                    SeedValue::Toggle(enabled) => self.set_tool_enabled(&suggestion.name, enabled),
                };
                Some((suggestion.name.clone(), outcome))
            })
            .collect()
    }

    pub fn load_image(&self, path: &Path) -> Result<LoadedImage> {
        let editor = self.require_editor()?;
        let loaded = editor.load_image(path)?;
        self.events.emit(
            "image_loaded",
            map_object(json!({
                "path": path.to_string_lossy().to_string(),
                "name": loaded.name,
                "editor": editor.name(),
                "width": loaded.width,
                "height": loaded.height,
                "sha256": loaded.sha256,
            })),
        )?;
        Ok(loaded)
    }

    pub fn export_data_url(&self) -> Result<String> {
        self.require_editor()?.to_data_url()
    }

    pub fn export_png(&self, path: &Path) -> Result<PathBuf> {
        let url = self.export_data_url()?;
        let bytes = decode_data_url(&url)?;
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &bytes)
            .with_context(|| format!("failed writing {}", path.display()))?;
        self.events.emit(
            "image_exported",
            map_object(json!({
                "path": path.to_string_lossy().to_string(),
                "bytes": bytes.len(),
                "sha256": sha256_hex(&bytes),
            })),
        )?;
        Ok(path.to_path_buf())
    }

    pub fn resize_ui(&self, width: u32, height: u32) -> Result<()> {
        self.require_editor()?.resize_ui(width, height)
    }

    pub fn activate_menu(&self, menu: &str) -> Result<()> {
        self.require_editor()?.activate_menu(menu)
    }

    fn require_editor(&self) -> Result<EditorHandle> {
        match self.bridge.get() {
            Some(editor) => Ok(editor),
            None => bail!("no editor mounted"),
        }
    }
}

pub fn load_tool_ranges(override_path: Option<&Path>) -> ToolRangeTable {
    override_path
        .filter(|path| path.exists())
        .and_then(|path| ToolRangeTable::with_override_file(path).ok())
        .unwrap_or_default()
}

fn tool_ranges_override_path(home: Option<String>) -> Option<PathBuf> {
    home.map(PathBuf::from)
        .map(|home| home.join(".promptedit").join("tool_ranges.json"))
}

pub fn is_locked_error(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.to_string().to_ascii_lowercase().contains("locked"))
}

/// Decodes a base64 `data:` URL into its payload bytes.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let Some((header, data)) = url.split_once(',') else {
        bail!("malformed data URL");
    };
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        bail!("unsupported data URL header: {header}");
    }
    BASE64
        .decode(data.trim())
        .context("data URL payload is not valid base64")
}

fn error_chain_text(err: &anyhow::Error, max_chars: usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    for cause in err.chain() {
        let text = cause.to_string();
        let trimmed = text.trim();
        if trimmed.is_empty() || parts.last().map(String::as_str) == Some(trimmed) {
            continue;
        }
        parts.push(trimmed.to_string());
    }
    if parts.is_empty() {
        return truncate_text(&err.to_string(), max_chars);
    }
    truncate_text(&parts.join(" | caused by: "), max_chars)
}

fn truncate_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    value.chars().take(max_chars).collect::<String>() + "…"
}

fn finite_or_null(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn map_object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}
