//! Top-level navigation sections.

use std::fmt::{Display, Formatter};

/// Tab shown by the navigation shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    Calculator,
    TaskList,
    Gallery,
}

impl Section {
    /// All sections in tab order.
    pub const ALL: [Section; 3] = [Self::Calculator, Self::TaskList, Self::Gallery];

    /// Stable section id used by the shell (`data-section` value).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Calculator => "calculator",
            Self::TaskList => "tasklist",
            Self::Gallery => "gallery",
        }
    }

    /// Human-readable tab title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Calculator => "Calculator",
            Self::TaskList => "Task List",
            Self::Gallery => "Gallery",
        }
    }

    /// Parses a section id. Matching is case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == normalized)
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
