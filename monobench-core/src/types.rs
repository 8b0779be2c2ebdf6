// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Value types shared across the pipeline.
//!
//! The tool roster is a closed enum: adding a tool is a code change, never a
//! runtime configuration option.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HardValidationError;

/// Identifier of one benchmarked build tool.
///
/// Declaration order is the fixed iteration order used for ranking and
/// serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolId {
    Nx,
    Turbo,
    Lerna,
    Lage,
    Moon,
}

impl ToolId {
    /// Every tool, in fixed order.
    pub const ALL: [ToolId; 5] = [
        ToolId::Nx,
        ToolId::Turbo,
        ToolId::Lerna,
        ToolId::Lage,
        ToolId::Moon,
    ];

    /// Lowercase identifier, as used in file names and JSON keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolId::Nx => "nx",
            ToolId::Turbo => "turbo",
            ToolId::Lerna => "lerna",
            ToolId::Lage => "lage",
            ToolId::Moon => "moon",
        }
    }

    /// Capitalised identifier, used as the right-hand side of comparison keys.
    pub fn title(&self) -> &'static str {
        match self {
            ToolId::Nx => "Nx",
            ToolId::Turbo => "Turbo",
            ToolId::Lerna => "Lerna",
            ToolId::Lage => "Lage",
            ToolId::Moon => "Moon",
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolId {
    type Err = HardValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ToolId::ALL
            .into_iter()
            .find(|tool| tool.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| HardValidationError::UnknownTool {
                name: s.to_string(),
            })
    }
}

/// One external command: an executable name plus its ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub executable: String,
    pub arguments: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(executable: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            executable: executable.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    /// A copy of this command with `extra` appended to its arguments.
    pub fn with_appended(&self, extra: &[String]) -> Self {
        let mut arguments = self.arguments.clone();
        arguments.extend_from_slice(extra);
        Self {
            executable: self.executable.clone(),
            arguments,
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.executable)?;
        for arg in &self.arguments {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
