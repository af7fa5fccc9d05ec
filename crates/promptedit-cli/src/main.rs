use std::io::{self, BufRead, ErrorKind, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use promptedit_contracts::chat::{parse_intent, Intent, CHAT_HELP_COMMANDS};
use promptedit_contracts::plan::{build_plan, ControlKind, PromptPlan};
use promptedit_contracts::tools::{slider_props, ToolRangeTable, TOOL_SLIDER_COMPONENT};
use promptedit_engine::{ApplyOutcome, DryrunEditor, EditSession, EngineConfig};
use serde_json::{json, Value};

#[derive(Debug, Parser)]
#[command(name = "promptedit", version, about = "Prompt-driven photo filter assistant")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Plan(PlanArgs),
    Apply(ApplyArgs),
    Chat(ChatArgs),
}

#[derive(Debug, Parser)]
struct PlanArgs {
    #[arg(long)]
    prompt: String,
}

#[derive(Debug, Parser)]
struct ApplyArgs {
    #[arg(long)]
    image: PathBuf,
    #[arg(long)]
    tool: String,
    #[arg(long, allow_hyphen_values = true)]
    value: Option<f64>,
    /// Remove the filter instead of applying it.
    #[arg(long, conflicts_with = "value")]
    off: bool,
    #[arg(long)]
    out: Option<PathBuf>,
    #[command(flatten)]
    session: SessionArgs,
}

#[derive(Debug, Parser)]
struct ChatArgs {
    #[arg(long)]
    image: Option<PathBuf>,
    #[command(flatten)]
    session: SessionArgs,
}

#[derive(Debug, Clone, Args)]
struct SessionArgs {
    #[arg(long)]
    events: Option<PathBuf>,
    #[arg(long)]
    retry_delay_ms: Option<u64>,
    #[arg(long)]
    tool_ranges: Option<PathBuf>,
}

impl SessionArgs {
    fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::from_env();
        if let Some(path) = &self.events {
            config.events_path = Some(path.clone());
        }
        if let Some(delay) = self.retry_delay_ms {
            config.retry_delay = Duration::from_millis(delay);
        }
        if let Some(path) = &self.tool_ranges {
            config.tool_ranges_path = Some(path.clone());
        }
        config
    }
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("promptedit error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Plan(args) => run_plan(args),
        Command::Apply(args) => run_apply(args),
        Command::Chat(args) => {
            run_chat(args)?;
            Ok(0)
        }
    }
}

fn run_plan(args: PlanArgs) -> Result<i32> {
    let ranges = promptedit_engine::load_tool_ranges(
        EngineConfig::from_env().tool_ranges_path.as_deref(),
    );
    let payload = match build_plan(&args.prompt) {
        Some(plan) => plan_json(&plan, &ranges),
        None => Value::Null,
    };
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(0)
}

fn run_apply(args: ApplyArgs) -> Result<i32> {
    let session = EditSession::new(&args.session.engine_config())?;
    let _guard = session.mount(Arc::new(DryrunEditor::new()));
    let loaded = session.load_image(&args.image)?;
    println!(
        "Loaded {} ({}x{})",
        loaded.name, loaded.width, loaded.height
    );

    let outcome = if args.off {
        session.set_tool_enabled(&args.tool, false)
    } else {
        let value = match args.value {
            Some(value) => value,
            None => match session.ranges().get(&args.tool) {
                Some(range) => range.default,
                None => 0.0,
            },
        };
        session.apply_tool(&args.tool, value)
    };
    println!("{}", describe_outcome(&args.tool, &outcome));

    if let Some(out) = &args.out {
        let written = session.export_png(out)?;
        println!("Exported {}", written.display());
    }
    Ok(if outcome.is_success() { 0 } else { 2 })
}

fn run_chat(args: ChatArgs) -> Result<()> {
    let mut session = EditSession::new(&args.session.engine_config())?;
    let _guard = session.mount(Arc::new(DryrunEditor::new()));
    if let Some(path) = &args.image {
        let loaded = session.load_image(path)?;
        println!(
            "Loaded {} ({}x{})",
            loaded.name, loaded.width, loaded.height
        );
    }

    println!("PromptEdit chat started. Describe a look, or type /help for commands.");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        let read = match input.read_line(&mut line) {
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        if read == 0 {
            break;
        }

        let intent = parse_intent(line.trim_end_matches(['\n', '\r']));
        if intent.action == "noop" {
            continue;
        }
        for reply in handle_chat_intent(&mut session, &intent) {
            println!("{reply}");
        }
    }
    Ok(())
}

/// Executes one chat intent and returns the lines to show the user.
fn handle_chat_intent(session: &mut EditSession, intent: &Intent) -> Vec<String> {
    match intent.action.as_str() {
        "help" => vec![format!("Commands: {}", CHAT_HELP_COMMANDS.join("  "))],
        "plan" => {
            let prompt = intent.prompt.as_deref().unwrap_or_default();
            match session.plan(prompt) {
                Ok(Some(plan)) => render_plan(&plan, session.ranges()),
                Ok(None) => Vec::new(),
                Err(err) => vec![format!("Plan failed: {err:#}")],
            }
        }
        "apply_plan" => {
            let Some(plan) = session.last_plan().cloned() else {
                return vec!["No plan yet. Describe the look you want first.".to_string()];
            };
            session
                .apply_plan(&plan)
                .iter()
                .map(|(tool, outcome)| describe_outcome(tool, outcome))
                .collect()
        }
        "apply_tool" => {
            let Some(tool) = non_empty_arg(intent, "tool") else {
                return vec!["/apply requires a tool name".to_string()];
            };
            let Some(value) = intent.command_args.get("value").and_then(Value::as_f64) else {
                return vec![format!("/apply {tool} requires a numeric value")];
            };
            vec![describe_outcome(&tool, &session.apply_tool(&tool, value))]
        }
        "enable_tool" | "disable_tool" => {
            let Some(tool) = non_empty_arg(intent, "tool") else {
                return vec![format!("/{} requires a tool name", toggle_command(intent))];
            };
            let enabled = intent.action == "enable_tool";
            vec![describe_outcome(&tool, &session.set_tool_enabled(&tool, enabled))]
        }
        "load_image" => {
            let Some(path) = non_empty_arg(intent, "path") else {
                return vec!["/load requires a path".to_string()];
            };
            match session.load_image(&PathBuf::from(&path)) {
                Ok(loaded) => vec![format!(
                    "Loaded {} ({}x{})",
                    loaded.name, loaded.width, loaded.height
                )],
                Err(err) => vec![format!("Load failed: {err:#}")],
            }
        }
        "export_image" => {
            let path = non_empty_arg(intent, "path").unwrap_or_else(|| "prompt-edit.png".to_string());
            match session.export_png(&PathBuf::from(&path)) {
                Ok(written) => vec![format!("Exported {}", written.display())],
                Err(err) => vec![format!("Export failed: {err:#}")],
            }
        }
        "resize_ui" => {
            let dimension = |key: &str| {
                intent
                    .command_args
                    .get(key)
                    .and_then(Value::as_u64)
                    .and_then(|value| u32::try_from(value).ok())
            };
            let (Some(width), Some(height)) = (dimension("width"), dimension("height")) else {
                return vec!["/resize requires <width> <height>".to_string()];
            };
            match session.resize_ui(width, height) {
                Ok(()) => vec![format!("Editor resized to {width}x{height}")],
                Err(err) => vec![format!("Resize failed: {err:#}")],
            }
        }
        "activate_menu" => {
            let Some(menu) = non_empty_arg(intent, "menu") else {
                return vec!["/menu requires a name".to_string()];
            };
            match session.activate_menu(&menu) {
                Ok(()) => vec![format!("Menu {menu} active")],
                Err(err) => vec![format!("Menu failed: {err:#}")],
            }
        }
        "list_tools" => session
            .ranges()
            .list()
            .map(|(name, range)| {
                format!(
                    "{name}: {} to {} (default {})",
                    range.min, range.max, range.default
                )
            })
            .collect(),
        "unknown" => {
            let command = non_empty_arg(intent, "command").unwrap_or_default();
            vec![format!("Unknown command /{command}. Type /help for commands.")]
        }
        other => vec![format!("Unhandled action {other}")],
    }
}

fn toggle_command(intent: &Intent) -> &'static str {
    if intent.action == "enable_tool" {
        "on"
    } else {
        "off"
    }
}

fn non_empty_arg(intent: &Intent, key: &str) -> Option<String> {
    intent
        .command_args
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn render_plan(plan: &PromptPlan, ranges: &ToolRangeTable) -> Vec<String> {
    let mut lines = vec![plan.summary.clone()];
    for tool in &plan.tools {
        let control = match (tool.control, slider_props(tool, ranges)) {
            (ControlKind::Slider, Some(props)) => {
                format!("slider {}..{}", props.min, props.max)
            }
            (ControlKind::Slider, None) => "slider".to_string(),
            (ControlKind::Checkbox, _) => "checkbox".to_string(),
        };
        lines.push(format!(
            "  {:<13} {:>8}  {:>3}%  [{control}]  {}",
            tool.name, tool.value, tool.percent, tool.reason
        ));
    }
    lines.push("Type /accept to apply all, or /apply <tool> <value>.".to_string());
    lines
}

fn plan_json(plan: &PromptPlan, ranges: &ToolRangeTable) -> Value {
    let controls: Vec<Value> = plan
        .tools
        .iter()
        .filter_map(|tool| slider_props(tool, ranges))
        .filter_map(|props| serde_json::to_value(props).ok())
        .collect();
    json!({
        "prompt": plan.prompt,
        "summary": plan.summary,
        "tools": plan.tools,
        "component": TOOL_SLIDER_COMPONENT,
        "controls": controls,
    })
}

fn describe_outcome(tool: &str, outcome: &ApplyOutcome) -> String {
    match outcome {
        ApplyOutcome::Applied { filter, attempts } if *attempts > 1 => {
            format!("{tool}: applied {filter} after {attempts} attempts")
        }
        ApplyOutcome::Applied { filter, .. } => format!("{tool}: applied {filter}"),
        ApplyOutcome::Removed { filter } => format!("{tool}: removed {filter}"),
        ApplyOutcome::Unresolved { .. } => format!("{tool}: no matching filter, skipped"),
        ApplyOutcome::NotToggle { filter } => {
            format!("{tool}: {filter} needs a value, use /apply {tool} <value>")
        }
        ApplyOutcome::NoEditor => format!("{tool}: no editor mounted, skipped"),
        ApplyOutcome::Failed { filter, error } => format!("{tool}: {filter} failed ({error})"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use image::{Rgb, RgbImage};
    use promptedit_contracts::chat::parse_intent;
    use promptedit_contracts::plan::build_plan;
    use promptedit_contracts::tools::ToolRangeTable;
    use promptedit_engine::{ApplyOutcome, DryrunEditor, EditSession, EngineConfig};
    use serde_json::json;

    use super::{describe_outcome, handle_chat_intent, plan_json, render_plan};

    fn session() -> anyhow::Result<EditSession> {
        EditSession::new(&EngineConfig {
            retry_delay: Duration::ZERO,
            events_path: None,
            tool_ranges_path: None,
        })
    }

    fn chat(session: &mut EditSession, line: &str) -> Vec<String> {
        handle_chat_intent(session, &parse_intent(line))
    }

    #[test]
    fn plan_json_includes_slider_controls_only() {
        let plan = build_plan("vintage pixel").unwrap();
        let payload = plan_json(&plan, &ToolRangeTable::default());
        assert_eq!(payload["prompt"], json!("vintage pixel"));
        assert_eq!(payload["tools"][0]["name"], json!("Sepia"));
        assert_eq!(payload["tools"][0]["control"], json!("checkbox"));
        let controls = payload["controls"].as_array().cloned().unwrap_or_default();
        assert_eq!(controls.len(), 1);
        assert_eq!(controls[0]["toolId"], json!("pixelate"));
        assert_eq!(controls[0]["defaultValue"], json!(12.0));
        assert_eq!(payload["component"]["name"], json!("ToolSlider"));
    }

    #[test]
    fn render_plan_lists_each_tool() {
        let plan = build_plan("cinematic").unwrap();
        let lines = render_plan(&plan, &ToolRangeTable::default());
        assert_eq!(lines.len(), plan.tools.len() + 2);
        assert!(lines[1].contains("Brightness"));
        assert!(lines[1].contains("slider -30..30"));
    }

    #[test]
    fn outcome_descriptions() {
        assert_eq!(
            describe_outcome(
                "Brightness",
                &ApplyOutcome::Applied {
                    filter: "brightness",
                    attempts: 2
                }
            ),
            "Brightness: applied brightness after 2 attempts"
        );
        assert_eq!(
            describe_outcome("Fade", &ApplyOutcome::Unresolved { tool: "Fade".into() }),
            "Fade: no matching filter, skipped"
        );
    }

    #[test]
    fn chat_flow_plans_applies_and_exports() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let image_path = temp.path().join("photo.png");
        RgbImage::from_pixel(4, 4, Rgb([90, 90, 90])).save(&image_path)?;

        let mut session = session()?;
        let editor = Arc::new(DryrunEditor::new());
        let _guard = session.mount(editor.clone());

        assert_eq!(
            chat(&mut session, "/accept"),
            vec!["No plan yet. Describe the look you want first."]
        );
        let load = chat(&mut session, &format!("/load \"{}\"", image_path.display()));
        assert_eq!(load, vec!["Loaded photo.png (4x4)"]);

        let plan_lines = chat(&mut session, "moody black and white");
        assert!(plan_lines.iter().any(|line| line.contains("Grayscale")));

        let applied = chat(&mut session, "/accept");
        assert_eq!(applied.len(), 4);
        assert!(editor.filter_options("grayscale").is_some());

        assert_eq!(
            chat(&mut session, "/off grayscale"),
            vec!["grayscale: removed grayscale"]
        );
        assert_eq!(
            chat(&mut session, "/apply Color Filter 15"),
            vec!["Color Filter: applied colorFilter"]
        );
        assert_eq!(
            editor.filter_options("colorFilter").unwrap()["distance"],
            json!(0.5)
        );
        assert_eq!(
            chat(&mut session, "/apply Fade 3"),
            vec!["Fade: no matching filter, skipped"]
        );
        assert_eq!(
            chat(&mut session, "/on Pixelate"),
            vec!["Pixelate: pixelate needs a value, use /apply Pixelate <value>"]
        );
        assert!(editor.filter_options("pixelate").is_none());
        assert_eq!(
            chat(&mut session, "/apply Blur"),
            vec!["/apply Blur requires a numeric value"]
        );

        let out = temp.path().join("edited.png");
        let exported = chat(&mut session, &format!("/export \"{}\"", out.display()));
        assert_eq!(exported.len(), 1);
        assert!(out.exists());
        Ok(())
    }

    #[test]
    fn chat_ui_commands() -> anyhow::Result<()> {
        let mut session = session()?;
        let editor = Arc::new(DryrunEditor::new());
        let _guard = session.mount(editor.clone());

        assert_eq!(
            chat(&mut session, "/resize 1024 720"),
            vec!["Editor resized to 1024x720"]
        );
        assert_eq!(editor.ui_size(), Some((1024, 720)));
        assert_eq!(
            chat(&mut session, "/resize big"),
            vec!["/resize requires <width> <height>"]
        );
        assert_eq!(chat(&mut session, "/menu filter"), vec!["Menu filter active"]);
        assert!(chat(&mut session, "/tools")[0].starts_with("Brightness: -30 to 30"));
        assert_eq!(
            chat(&mut session, "/wat"),
            vec!["Unknown command /wat. Type /help for commands."]
        );
        assert!(chat(&mut session, "/help")[0].starts_with("Commands: "));
        Ok(())
    }
}
