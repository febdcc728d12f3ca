pub mod ast;
pub mod normalizer;
pub mod parser;
pub mod serializer;

pub use ast::*;
pub use normalizer::normalize;
pub use parser::{parse, ParseError, Rule, ScriptParser};

/// Process raw script text through the full pipeline: normalize, then
/// parse, returning the executable commands in declared order.
pub fn process(input: &str) -> Result<Vec<Command>, ParseError> {
    let normalized = normalize(input);
    let script = parse(&normalized)?;
    Ok(script.commands().cloned().collect())
}
