use std::path::Path;

use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::names::normalize_tool_key;

const DEFAULT_TOOL_RANGES_JSON: &str = include_str!("../../resources/tool_ranges.json");

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl SliderRange {
    pub fn clamp(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }
}

/// Slider ranges keyed by tool display name, in declaration order.
#[derive(Debug, Clone)]
pub struct ToolRangeTable {
    ranges: IndexMap<String, SliderRange>,
}

impl Default for ToolRangeTable {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ToolRangeTable {
    pub fn new(ranges: Option<IndexMap<String, SliderRange>>) -> Self {
        Self {
            ranges: ranges.unwrap_or_else(default_ranges),
        }
    }

    /// Bundled ranges with the rows of `path` merged on top.
    pub fn with_override_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading tool ranges {}", path.display()))?;
        let mut table = Self::default();
        table.merge_json(&raw);
        Ok(table)
    }

    /// Merges override rows. Rows or fields that are not numeric are skipped;
    /// a row that would end with `min > max` is dropped.
    pub fn merge_json(&mut self, raw: &str) {
        let Ok(rows) = serde_json::from_str::<IndexMap<String, Value>>(raw) else {
            return;
        };
        for (name, row_value) in &rows {
            let Some(row) = row_value.as_object() else {
                continue;
            };
            let existing = self.ranges.get(name).copied();
            let Some(merged) = merge_row(existing, row) else {
                continue;
            };
            self.ranges.insert(name.to_string(), merged);
        }
    }

    /// Looks up by display name, then by separator-insensitive key.
    pub fn get(&self, name: &str) -> Option<&SliderRange> {
        if let Some(range) = self.ranges.get(name) {
            return Some(range);
        }
        let key = normalize_tool_key(name);
        self.ranges
            .iter()
            .find(|(label, _)| normalize_tool_key(label) == key)
            .map(|(_, range)| range)
    }

    pub fn list(&self) -> impl Iterator<Item = (&str, &SliderRange)> {
        self.ranges
            .iter()
            .map(|(name, range)| (name.as_str(), range))
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

fn merge_row(existing: Option<SliderRange>, row: &Map<String, Value>) -> Option<SliderRange> {
    let field = |key: &str| {
        row.get(key)
            .and_then(Value::as_f64)
            .filter(|value| value.is_finite())
    };
    let (min, max) = match existing {
        Some(range) => (
            field("min").unwrap_or(range.min),
            field("max").unwrap_or(range.max),
        ),
        None => (field("min")?, field("max")?),
    };
    if min > max {
        return None;
    }
    let default = field("default")
        .or(existing.map(|range| range.default))
        .unwrap_or(min)
        .clamp(min, max);
    Some(SliderRange { min, max, default })
}

fn default_ranges() -> IndexMap<String, SliderRange> {
    let mut table = ToolRangeTable {
        ranges: IndexMap::new(),
    };
    table.merge_json(DEFAULT_TOOL_RANGES_JSON);
    table.ranges
}
