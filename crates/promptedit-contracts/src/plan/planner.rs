use std::collections::HashSet;

use super::category_registry::{SuggestionSpec, CATEGORIES, FALLBACK_SUGGESTIONS};
use super::types::{PromptPlan, ToolSuggestion};

pub const PLAN_SUMMARY: &str = "Recommended adjustments generated from your prompt.";

fn push_unique(
    tools: &mut Vec<ToolSuggestion>,
    seen: &mut HashSet<&'static str>,
    spec: &SuggestionSpec,
) {
    if seen.insert(spec.name) {
        tools.push(spec.to_suggestion());
    }
}

/// Maps free text onto an ordered list of tool suggestions.
///
/// Returns `None` for empty or whitespace-only input. A non-empty prompt that
/// matches no category gets the fallback pair, so a returned plan always has
/// at least one tool.
pub fn build_plan(prompt: &str) -> Option<PromptPlan> {
    let cleaned = prompt.trim();
    if cleaned.is_empty() {
        return None;
    }
    let lowered = cleaned.to_lowercase();

    let mut tools: Vec<ToolSuggestion> = Vec::new();
    let mut seen: HashSet<&'static str> = HashSet::new();
    for category in CATEGORIES.iter().filter(|spec| spec.matches(&lowered)) {
        for spec in category.suggestions {
            push_unique(&mut tools, &mut seen, spec);
        }
    }

    if tools.is_empty() {
        for spec in FALLBACK_SUGGESTIONS {
            push_unique(&mut tools, &mut seen, spec);
        }
    }

    Some(PromptPlan {
        prompt: cleaned.to_string(),
        summary: PLAN_SUMMARY.to_string(),
        tools,
    })
}
