use std::collections::BTreeMap;

use serde_json::{Number, Value};

use super::command_registry::{
    CommandSpec, NO_ARG_COMMANDS, RAW_ARG_COMMANDS, RESIZE_COMMAND, SINGLE_PATH_COMMANDS,
    TOOL_COMMANDS, TOOL_VALUE_COMMANDS,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Intent {
    pub action: String,
    pub raw: String,
    pub prompt: Option<String>,
    pub command_args: BTreeMap<String, Value>,
}

impl Intent {
    fn new(action: &str, raw: &str) -> Self {
        Self {
            action: action.to_string(),
            raw: raw.to_string(),
            prompt: None,
            command_args: BTreeMap::new(),
        }
    }

    fn with_arg(mut self, key: &str, value: Value) -> Self {
        self.command_args.insert(key.to_string(), value);
        self
    }
}

fn find_action(command: &str, specs: &[CommandSpec]) -> Option<&'static str> {
    specs
        .iter()
        .find(|spec| spec.command == command)
        .map(|spec| spec.action)
}

fn split_args(arg: &str) -> Vec<String> {
    if arg.trim().is_empty() {
        return Vec::new();
    }
    match shell_words::split(arg) {
        Ok(parts) => parts
            .into_iter()
            .filter(|value| !value.is_empty())
            .collect(),
        Err(_) => arg
            .split_whitespace()
            .map(str::to_string)
            .filter(|value| !value.is_empty())
            .collect(),
    }
}

fn number_value(raw: &str) -> Option<Value> {
    raw.trim_start_matches('+')
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// `Color Filter 12` → (`Color Filter`, 12). A trailing token that is not a
/// number stays part of the tool name and the value is `Null`.
fn parse_tool_value_args(arg: &str) -> (String, Value) {
    let mut parts = split_args(arg);
    let value = match parts.last().and_then(|last| number_value(last)) {
        Some(value) => {
            parts.pop();
            value
        }
        None => Value::Null,
    };
    (parts.join(" "), value)
}

fn parse_single_path_arg(arg: &str) -> String {
    split_args(arg).join(" ")
}

pub fn parse_intent(text: &str) -> Intent {
    let raw_trimmed = text.trim();
    if raw_trimmed.is_empty() {
        return Intent::new("noop", text);
    }

    if let Some(slash_tail) = raw_trimmed.strip_prefix('/') {
        let command_len = slash_tail
            .chars()
            .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
            .count();
        if command_len > 0 {
            let command = slash_tail[..command_len].to_ascii_lowercase();
            let arg = slash_tail[command_len..].trim();

            if let Some(action) = find_action(&command, TOOL_VALUE_COMMANDS) {
                let (tool, value) = parse_tool_value_args(arg);
                return Intent::new(action, text)
                    .with_arg("tool", Value::String(tool))
                    .with_arg("value", value);
            }

            if let Some(action) = find_action(&command, TOOL_COMMANDS) {
                return Intent::new(action, text)
                    .with_arg("tool", Value::String(split_args(arg).join(" ")));
            }

            if let Some(action) = find_action(&command, SINGLE_PATH_COMMANDS) {
                return Intent::new(action, text)
                    .with_arg("path", Value::String(parse_single_path_arg(arg)));
            }

            if let Some(action) = find_action(&command, RAW_ARG_COMMANDS) {
                return Intent::new(action, text)
                    .with_arg("menu", Value::String(arg.to_string()));
            }

            if command == RESIZE_COMMAND.command {
                let parts = split_args(arg);
                let dimension = |idx: usize| {
                    parts
                        .get(idx)
                        .and_then(|raw| raw.parse::<u32>().ok())
                        .map(|value| Value::Number(value.into()))
                        .unwrap_or(Value::Null)
                };
                return Intent::new(RESIZE_COMMAND.action, text)
                    .with_arg("width", dimension(0))
                    .with_arg("height", dimension(1));
            }

            if let Some(action) = find_action(&command, NO_ARG_COMMANDS) {
                return Intent::new(action, text);
            }

            return Intent::new("unknown", text)
                .with_arg("command", Value::String(command))
                .with_arg("arg", Value::String(arg.to_string()));
        }
    }

    let mut intent = Intent::new("plan", text);
    intent.prompt = Some(raw_trimmed.to_string());
    intent
}
