use super::ast::*;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "script.pest"]
pub struct ScriptParser;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Parse error: {0}")]
    Pest(#[from] Box<pest::error::Error<Rule>>),
    #[error("Unknown rule: {0:?}")]
    UnknownRule(Rule),
    #[error("Invalid integer: {0}")]
    InvalidInteger(#[from] std::num::ParseIntError),
}

pub fn parse(input: &str) -> Result<Script, ParseError> {
    let mut pairs =
        ScriptParser::parse(Rule::script, input).map_err(Box::new)?;
    let mut script = Script { lines: Vec::new() };

    if let Some(pair) = pairs.next() {
        if pair.as_rule() == Rule::script {
            for inner in pair.into_inner() {
                if inner.as_rule() == Rule::line {
                    let line = parse_line(inner)?;
                    if line.command.is_some() || line.comment.is_some() {
                        script.lines.push(line);
                    }
                }
            }
        }
    }

    Ok(script)
}

fn parse_line(pair: Pair<Rule>) -> Result<Line, ParseError> {
    let mut command = None;
    let mut comment = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::comment => {
                comment = Some(inner.as_str().trim_start_matches("//").trim().to_string());
            }
            _ => command = Some(parse_command(inner)?),
        }
    }

    Ok(Line { command, comment })
}

fn parse_command(pair: Pair<Rule>) -> Result<Command, ParseError> {
    match pair.as_rule() {
        Rule::goto_cmd => Ok(Command::Goto(parse_goto(pair))),
        Rule::show_text_cmd => Ok(Command::ShowText(parse_show_text(pair))),
        Rule::size_cmd => Ok(Command::Size(parse_size(pair)?)),
        Rule::assert_count_cmd => Ok(Command::AssertCount(parse_assert_count(pair)?)),
        Rule::assert_property_cmd => Ok(Command::AssertProperty(parse_assert_property(pair))),
        rule => Err(ParseError::UnknownRule(rule)),
    }
}

// --- Parsers for specific commands ---

fn parse_goto(pair: Pair<Rule>) -> GotoCmd {
    let url = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::url_value)
        .map(|p| p.as_str().to_string())
        .unwrap_or_default();
    GotoCmd { url }
}

fn parse_show_text(pair: Pair<Rule>) -> ShowTextCmd {
    let enabled = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::bool_value)
        .map(|p| p.as_str() == "true")
        .unwrap_or_default();
    ShowTextCmd { enabled }
}

fn parse_size(pair: Pair<Rule>) -> Result<SizeCmd, ParseError> {
    let mut inners = pair.into_inner().filter(|p| p.as_rule() == Rule::integer);
    let width = parse_integer(inners.next().expect("grammar yields two integers"))?;
    let height = parse_integer(inners.next().expect("grammar yields two integers"))?;
    Ok(SizeCmd { width, height })
}

fn parse_assert_count(pair: Pair<Rule>) -> Result<AssertCountCmd, ParseError> {
    let mut selector = String::new();
    let mut count = 0;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::string_value => selector = parse_string(inner),
            Rule::integer => count = inner.as_str().parse()?,
            _ => {}
        }
    }
    Ok(AssertCountCmd { selector, count })
}

fn parse_assert_property(pair: Pair<Rule>) -> AssertPropertyCmd {
    let mut selector = String::new();
    let mut properties = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::string_value => selector = parse_string(inner),
            Rule::property_map => {
                for pair_rule in inner.into_inner() {
                    if pair_rule.as_rule() == Rule::property_pair {
                        properties.push(parse_property_pair(pair_rule));
                    }
                }
            }
            _ => {}
        }
    }
    AssertPropertyCmd {
        selector,
        properties,
    }
}

fn parse_property_pair(pair: Pair<Rule>) -> Property {
    let mut name = String::new();
    let mut expected = String::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::property_name => name = parse_name_value(inner),
            Rule::string_value => expected = parse_string(inner),
            _ => {}
        }
    }
    Property { name, expected }
}

// --- Helpers ---

fn parse_integer<T: std::str::FromStr<Err = std::num::ParseIntError>>(
    pair: Pair<Rule>,
) -> Result<T, ParseError> {
    Ok(pair.as_str().parse()?)
}

fn parse_name_value(pair: Pair<Rule>) -> String {
    // property_name = { identifier | string_value }
    let inner = pair.into_inner().next().expect("property_name has inner");
    if inner.as_rule() == Rule::string_value {
        parse_string(inner)
    } else {
        inner.as_str().to_string()
    }
}

fn parse_string(pair: Pair<Rule>) -> String {
    let inner = pair.into_inner().next().expect("string_value has inner");
    let raw = inner.as_str();
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                match next {
                    '"' => out.push('"'),
                    '\\' => out.push('\\'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    _ => out.push(next),
                }
            } else {
                out.push('\\');
            }
        } else {
            out.push(c);
        }
    }
    out
}
