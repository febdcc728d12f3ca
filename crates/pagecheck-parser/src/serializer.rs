//! Canonical text form for parsed scripts.
//!
//! Serializing a `Script` and re-parsing the output yields an
//! identical command sequence; property names are always emitted
//! quoted and pairs keep their declared order.

use crate::ast::{Command, Line, Script};
use std::fmt;

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.command, &self.comment) {
            (Some(command), _) => write!(f, "{}", command),
            (None, Some(comment)) => write!(f, "// {}", comment),
            (None, None) => Ok(()),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Goto(cmd) => write!(f, "goto: {}", cmd.url),
            Command::ShowText(cmd) => write!(f, "show-text: {}", cmd.enabled),
            Command::Size(cmd) => write!(f, "size: ({}, {})", cmd.width, cmd.height),
            Command::AssertCount(cmd) => write!(
                f,
                "assert-count: ({}, {})",
                quote(&cmd.selector),
                cmd.count
            ),
            Command::AssertProperty(cmd) => {
                write!(f, "assert-property: ({}, {{", quote(&cmd.selector))?;
                for (idx, property) in cmd.properties.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", quote(&property.name), quote(&property.expected))?;
                }
                write!(f, "}})")
            }
        }
    }
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
