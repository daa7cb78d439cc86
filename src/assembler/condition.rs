//! Condition evaluation for `conditional` blocks.
//!
//! The grammar is deliberately tiny: `<lhs> == <rhs>` or `<lhs> != <rhs>`, where either side may contain
//! `{{var}}` placeholders. Placeholders are replaced by their quoted values first, then the string is split on the
//! first operator and the trimmed, unquoted sides are compared as strings. Anything else evaluates to `false`.

use log::warn;

use crate::utils::prompt_processing::replace_placeholders_with;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Eq,
    Ne,
}

impl Operator {
    fn token(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
        }
    }
}

/// Evaluate `condition`, looking up placeholder values with `resolve`. Unresolved placeholders become `""`.
pub fn evaluate_condition<F, S>(condition: &str, mut resolve: F) -> bool
    where F: FnMut(&str) -> Option<S>, S: AsRef<str> {
    let substituted = replace_placeholders_with(condition, |name| {
        let value = resolve(name);
        let value: &str = match &value {
            Some(value) => value.as_ref(),
            None => "",
        };
        Some(format!("\"{}\"", value))
    });
    match split_on_operator(&substituted) {
        Some((lhs, operator, rhs)) => {
            let equal = unquote(lhs) == unquote(rhs);
            match operator {
                Operator::Eq => equal,
                Operator::Ne => !equal,
            }
        }
        None => {
            warn!("Condition `{}` has neither `==` nor `!=`, treating it as false", condition);
            false
        }
    }
}

fn split_on_operator(condition: &str) -> Option<(&str, Operator, &str)> {
    let first = [Operator::Eq, Operator::Ne]
        .into_iter()
        .filter_map(|operator| condition.find(operator.token()).map(|idx| (idx, operator)))
        .min_by_key(|(idx, _)| *idx);
    first.map(|(idx, operator)| {
        let (lhs, rest) = condition.split_at(idx);
        (lhs, operator, &rest[operator.token().len()..])
    })
}

fn unquote(side: &str) -> &str {
    side.trim().trim_matches(|c| c == '"' || c == '\'')
}
