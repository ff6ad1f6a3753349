// ─── Argument Formatter ───
// Rule filtering and `${name}` substitution for argument templates.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use crate::core::platform::PlatformContext;
use crate::core::version::rules::{self, Rule};

const OPEN: &str = "${";
const CLOSE: char = '}';

/// String or list of strings, as found under an argument's `value`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    Single(String),
    Multi(Vec<String>),
}

/// One entry of `arguments.game` / `arguments.jvm`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawArgument")]
pub enum Argument {
    Plain(ArgumentValue),
    Conditional { rules: Vec<Rule>, value: ArgumentValue },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawArgument {
    Bare(String),
    Object {
        #[serde(default)]
        rules: Option<Vec<Rule>>,
        value: ArgumentValue,
    },
}

impl From<RawArgument> for Argument {
    fn from(raw: RawArgument) -> Self {
        match raw {
            RawArgument::Bare(s) => Argument::Plain(ArgumentValue::Single(s)),
            RawArgument::Object { rules: None, value } => Argument::Plain(value),
            RawArgument::Object {
                rules: Some(rules),
                value,
            } => Argument::Conditional { rules, value },
        }
    }
}

/// Replace every `${name}` in `template` from `values` in a single pass.
///
/// An unterminated marker runs to the end of the string. Any name missing
/// from `values` yields `None`. Substituted text is not scanned again.
pub fn substitute(template: &str, values: &HashMap<String, String>) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];
        let (name, remainder) = match after_open.find(CLOSE) {
            Some(end) => (&after_open[..end], &after_open[end + 1..]),
            None => (after_open, ""),
        };

        match values.get(name) {
            Some(value) => out.push_str(value),
            None => {
                debug!("Unresolved placeholder ${{{}}} in {:?}", name, template);
                return None;
            }
        }
        rest = remainder;
    }

    out.push_str(rest);
    Some(out)
}

fn expand(value: &ArgumentValue, values: &HashMap<String, String>) -> Option<Vec<String>> {
    match value {
        ArgumentValue::Single(s) => substitute(s, values).map(|s| vec![s]),
        ArgumentValue::Multi(list) => {
            let expanded: Vec<String> = list
                .iter()
                .filter_map(|s| substitute(s, values))
                .collect();
            (!expanded.is_empty()).then_some(expanded)
        }
    }
}

/// Tokens for one argument, or `None` when it should be left off the
/// command line (rules did not apply or substitution failed).
pub fn format_argument(
    values: &HashMap<String, String>,
    argument: &Argument,
    ctx: &PlatformContext,
) -> Option<Vec<String>> {
    match argument {
        Argument::Plain(value) => expand(value, values),
        Argument::Conditional { rules, value } => {
            if rules::argument_rules_apply(rules, ctx) {
                expand(value, values)
            } else {
                None
            }
        }
    }
}

/// Format a whole argument list, preserving input order.
pub fn format_arguments<'a>(
    values: &HashMap<String, String>,
    arguments: impl IntoIterator<Item = &'a Argument>,
    ctx: &PlatformContext,
) -> Vec<String> {
    arguments
        .into_iter()
        .filter_map(|arg| format_argument(values, arg, ctx))
        .flatten()
        .collect()
}
