//! Serializable snapshot of a configured parser.
//!
//! Help rendering and this export are two projections of the same
//! declarations: the help text is for humans, the schema for tooling that
//! wants the registered state as data (documentation generators,
//! integration tests, shells).

use serde::{Deserialize, Serialize};

use crate::parser::Parser;
use crate::positional::PositionalMode;

/// How the engine consumes bare (non-option) tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PositionalSchema {
    /// Bare tokens are rejected.
    #[default]
    None,
    /// One bare token fills a single slot.
    Single,
    /// Bare tokens accumulate in order.
    Multi,
    /// The first bare token selects a subcommand.
    Subcommand,
}

/// One registered option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSchema {
    /// Primary name, e.g. `--configuration`.
    pub name: String,
    /// Alias, if registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Whether the option consumes the following token as its value.
    pub requires_value: bool,
    /// Help description.
    pub description: String,
    /// Help category, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Default-value display text, when registered with `show_default`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// One selectable subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcommandInfo {
    /// Name the command is selected by.
    pub name: String,
    /// One-line description.
    pub description: String,
}

/// Full description of a configured [`Parser`]: tool metadata, the option
/// registry in registration order, the positional mode, and the
/// subcommand catalog (sorted by name) when one is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserSchema {
    /// Tool name shown in the usage line.
    pub tool_name: String,
    /// Overview line.
    pub overview: String,
    /// Display name of the positional input.
    pub input_name: String,
    /// Active positional mode.
    pub positional: PositionalSchema,
    /// Registered options, in registration order.
    pub options: Vec<OptionSchema>,
    /// Subcommand catalog; empty unless the positional mode is
    /// `Subcommand`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<SubcommandInfo>,
}

impl<A: Default + 'static> Parser<A> {
    /// Builds a serializable snapshot of the registered state.
    pub fn schema(&self) -> ParserSchema {
        let positional = match &self.positional {
            PositionalMode::None => PositionalSchema::None,
            PositionalMode::Single(_) => PositionalSchema::Single,
            PositionalMode::Multi(_) => PositionalSchema::Multi,
            PositionalMode::Subcommand { .. } => PositionalSchema::Subcommand,
        };
        let subcommands = match &self.positional {
            PositionalMode::Subcommand { catalog, .. } => catalog
                .iter()
                .map(|(name, description)| SubcommandInfo {
                    name: name.clone(),
                    description: description.clone(),
                })
                .collect(),
            _ => Vec::new(),
        };
        ParserSchema {
            tool_name: self.tool_name.clone(),
            overview: self.overview.clone(),
            input_name: self.input_name.clone(),
            positional,
            options: self
                .options
                .iter()
                .map(|spec| OptionSchema {
                    name: spec.opt.name.clone(),
                    alias: spec.opt.alias.clone(),
                    requires_value: spec.requires_value,
                    description: spec.opt.description.clone(),
                    category: spec.opt.category.clone(),
                    default: spec.default_display.clone(),
                })
                .collect(),
            subcommands,
        }
    }
}
