//! Answer mode catalog.
//!
//! Modes are grouped into sections and never change at runtime. Entries
//! marked unavailable are listed but cannot be selected.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::warn;

/// Mode used when nothing (valid) has been selected.
pub const DEFAULT_MODE: &str = "random";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeDefinition {
    pub key: String,
    pub label: String,
    pub description: String,
    pub available: bool,
}

impl ModeDefinition {
    fn new(key: &str, label: &str, description: &str, available: bool) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            available,
        }
    }

    /// System instruction handed to the completion service for this mode.
    pub fn instruction(&self) -> String {
        format!("Respond in \"{}\" mode: {}", self.label, self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeSection {
    pub name: String,
    pub modes: Vec<ModeDefinition>,
}

impl ModeSection {
    /// Heading shown above the section in the selection list.
    pub fn title(&self) -> &str {
        if self.modes.iter().any(|m| m.key == "basic") {
            "Default"
        } else if self.modes.iter().any(|m| m.key == "short") {
            "Answer"
        } else if self.modes.iter().any(|m| m.key == "solution") {
            "Settings"
        } else {
            self.name.as_str()
        }
    }
}

/// Read-only, sectioned catalog of answer modes.
#[derive(Debug, Clone)]
pub struct ModeRegistry {
    sections: Vec<ModeSection>,
}

impl ModeRegistry {
    /// Build a registry. Later entries reusing an earlier key are dropped.
    pub fn new(sections: Vec<ModeSection>) -> Self {
        let mut seen = HashSet::new();
        let sections = sections
            .into_iter()
            .map(|mut section| {
                section.modes.retain(|mode| {
                    let fresh = seen.insert(mode.key.clone());
                    if !fresh {
                        warn!(key = %mode.key, "duplicate mode key ignored");
                    }
                    fresh
                });
                section
            })
            .collect();
        Self { sections }
    }

    /// The catalog shipped with the app.
    pub fn builtin() -> Self {
        Self::new(vec![
            ModeSection {
                name: "answer".to_string(),
                modes: vec![
                    ModeDefinition::new(
                        "random",
                        "Random Facts",
                        "Surprise the user with a fun, true fact related to their message.",
                        true,
                    ),
                    ModeDefinition::new(
                        "basic",
                        "Basic",
                        "Answer plainly, the way a general assistant would.",
                        true,
                    ),
                    ModeDefinition::new(
                        "short",
                        "Short Answers",
                        "Answer in one or two short sentences.",
                        true,
                    ),
                    ModeDefinition::new(
                        "detailed",
                        "Detailed",
                        "Give a thorough answer with examples where helpful.",
                        true,
                    ),
                    ModeDefinition::new(
                        "clear",
                        "Clear & Simple",
                        "Explain in simple words a beginner understands.",
                        true,
                    ),
                    ModeDefinition::new(
                        "friendly",
                        "Friendly Talking",
                        "Reply warmly and casually, like a friend.",
                        true,
                    ),
                    ModeDefinition::new(
                        "funny",
                        "Humorous",
                        "Answer with light humor.",
                        false,
                    ),
                ],
            },
            ModeSection {
                name: "other".to_string(),
                modes: vec![
                    ModeDefinition::new(
                        "solution",
                        "Problem Solving",
                        "Work through the problem step by step and give a solution.",
                        false,
                    ),
                    ModeDefinition::new(
                        "code",
                        "Code Helper",
                        "Answer with code and a short explanation.",
                        false,
                    ),
                    ModeDefinition::new(
                        "translate",
                        "Translation",
                        "Translate the user's message.",
                        false,
                    ),
                ],
            },
        ])
    }

    pub fn sections(&self) -> &[ModeSection] {
        &self.sections
    }

    pub fn get(&self, key: &str) -> Option<&ModeDefinition> {
        self.sections
            .iter()
            .flat_map(|s| s.modes.iter())
            .find(|m| m.key == key)
    }

    /// Whether `key` may become the current mode.
    pub fn is_selectable(&self, key: &str) -> bool {
        key == DEFAULT_MODE || self.get(key).is_some_and(|m| m.available)
    }

    /// Look up an entry for selection. Unknown and unavailable keys yield `None`.
    pub fn select(&self, key: &str) -> Option<&ModeDefinition> {
        self.get(key).filter(|m| m.available)
    }

    /// Sections whose labels contain `query` (case-insensitive).
    /// Sections left empty are omitted.
    pub fn filter(&self, query: &str) -> Vec<ModeSection> {
        let needle = query.to_lowercase();
        self.sections
            .iter()
            .map(|section| ModeSection {
                name: section.name.clone(),
                modes: section
                    .modes
                    .iter()
                    .filter(|m| m.label.to_lowercase().contains(&needle))
                    .cloned()
                    .collect(),
            })
            .filter(|section| !section.modes.is_empty())
            .collect()
    }

    /// Instruction per mode key, for the completion client.
    pub fn instructions(&self) -> HashMap<String, String> {
        self.sections
            .iter()
            .flat_map(|s| s.modes.iter())
            .map(|m| (m.key.clone(), m.instruction()))
            .collect()
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
