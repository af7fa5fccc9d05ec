mod category_registry;
mod planner;
mod types;

pub use category_registry::{CategorySpec, SuggestionSpec, CATEGORIES, FALLBACK_SUGGESTIONS};
pub use planner::{build_plan, PLAN_SUMMARY};
pub use types::{ControlKind, PromptPlan, SeedValue, ToolSuggestion};
