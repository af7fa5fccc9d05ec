use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Slider,
    Checkbox,
}

/// A single suggested adjustment. `name` is the display label and the key the
/// adapter resolves into a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSuggestion {
    pub name: String,
    pub value: String,
    pub percent: u8,
    pub reason: String,
    pub control: ControlKind,
}

/// Initial control state derived from a suggestion's display value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeedValue {
    Number(f64),
    Toggle(bool),
}

impl ToolSuggestion {
    /// Parses the display value into something a control can start from.
    ///
    /// Sliders take the last signed number in the text (`"+12"`, `"Warm 22"`).
    /// Checkboxes read `On`/`Off`.
    pub fn seed_value(&self) -> Option<SeedValue> {
        match self.control {
            ControlKind::Checkbox => {
                let lowered = self.value.trim().to_ascii_lowercase();
                match lowered.as_str() {
                    "on" | "true" | "yes" | "1" => Some(SeedValue::Toggle(true)),
                    "off" | "false" | "no" | "0" => Some(SeedValue::Toggle(false)),
                    _ => None,
                }
            }
            ControlKind::Slider => self
                .value
                .split_whitespace()
                .rev()
                .find_map(|token| token.trim_start_matches('+').parse::<f64>().ok())
                .filter(|value| value.is_finite())
                .map(SeedValue::Number),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptPlan {
    pub prompt: String,
    pub summary: String,
    pub tools: Vec<ToolSuggestion>,
}

impl PromptPlan {
    pub fn get(&self, name: &str) -> Option<&ToolSuggestion> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ControlKind, PromptPlan, SeedValue, ToolSuggestion};

    fn suggestion(value: &str, control: ControlKind) -> ToolSuggestion {
        ToolSuggestion {
            name: "Probe".to_string(),
            value: value.to_string(),
            percent: 50,
            reason: String::new(),
            control,
        }
    }

    #[test]
    fn slider_seed_reads_signed_and_labelled_numbers() {
        assert_eq!(
            suggestion("+12", ControlKind::Slider).seed_value(),
            Some(SeedValue::Number(12.0))
        );
        assert_eq!(
            suggestion("-10", ControlKind::Slider).seed_value(),
            Some(SeedValue::Number(-10.0))
        );
        assert_eq!(
            suggestion("Warm 22", ControlKind::Slider).seed_value(),
            Some(SeedValue::Number(22.0))
        );
        assert_eq!(suggestion("Warm", ControlKind::Slider).seed_value(), None);
    }

    #[test]
    fn checkbox_seed_reads_on_off() {
        assert_eq!(
            suggestion("On", ControlKind::Checkbox).seed_value(),
            Some(SeedValue::Toggle(true))
        );
        assert_eq!(
            suggestion(" off ", ControlKind::Checkbox).seed_value(),
            Some(SeedValue::Toggle(false))
        );
        assert_eq!(suggestion("maybe", ControlKind::Checkbox).seed_value(), None);
    }

    #[test]
    fn plan_serializes_control_in_lowercase() -> anyhow::Result<()> {
        let plan = PromptPlan {
            prompt: "bw".to_string(),
            summary: "s".to_string(),
            tools: vec![suggestion("On", ControlKind::Checkbox)],
        };
        let value = serde_json::to_value(&plan)?;
        assert_eq!(value["tools"][0]["control"], json!("checkbox"));
        assert_eq!(value["tools"][0]["percent"], json!(50));
        Ok(())
    }
}
