use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub lines: Vec<Line>,
}

impl Script {
    /// Executable commands in declared order, skipping comment-only lines.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.lines.iter().filter_map(|line| line.command.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub command: Option<Command>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Goto(GotoCmd),
    ShowText(ShowTextCmd),
    Size(SizeCmd),
    AssertCount(AssertCountCmd),
    AssertProperty(AssertPropertyCmd),
}

// --- Navigation ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GotoCmd {
    pub url: String,
}

// --- Session configuration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowTextCmd {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeCmd {
    pub width: u32,
    pub height: u32,
}

// --- Assertions ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertCountCmd {
    pub selector: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssertPropertyCmd {
    pub selector: String,
    pub properties: Vec<Property>,
}

/// One expected property reading. Kept as a pair list rather than a
/// map so declaration order survives a serialize/parse round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub expected: String,
}
