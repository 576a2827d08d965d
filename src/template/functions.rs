use crate::meta::{FieldStore, sanitize};

use super::TemplateError;
use super::eval::transliterate;

/// Functions callable from a template as `%name{...}`.
pub trait FunctionLibrary {
    /// Verify that `name` exists and accepts `arg_count` arguments.
    fn check(&self, name: &str, arg_count: usize) -> Result<(), TemplateError>;

    /// Run `name` on already evaluated arguments. `fields` is available for
    /// functions that take a field name rather than a value, like `ifdef`.
    fn invoke(
        &self,
        name: &str,
        args: &[String],
        fields: &FieldStore,
    ) -> Result<String, TemplateError>;
}

const DEFAULT_SHORTEN: usize = 32;

/// (name, minimum args, maximum args)
const SIGNATURES: &[(&str, usize, usize)] = &[
    ("shorten", 1, 2),
    ("ifdef", 1, 2),
    ("ifdefempty", 2, 3),
    ("ifdefnotempty", 2, 3),
    ("if", 2, 3),
    ("lower", 1, 1),
    ("upper", 1, 1),
    ("title", 1, 1),
    ("left", 2, 2),
    ("right", 2, 2),
    ("asciify", 1, 1),
    ("delchars", 2, 2),
    ("replchars", 3, 3),
    ("sanitize", 1, 1),
];

/// The built-in function set.
#[derive(Debug, Default, Clone, Copy)]
pub struct Builtins;

impl FunctionLibrary for Builtins {
    fn check(&self, name: &str, arg_count: usize) -> Result<(), TemplateError> {
        let &(_, min, max) = SIGNATURES
            .iter()
            .find(|(n, _, _)| *n == name)
            .ok_or_else(|| TemplateError::UnknownFunction(name.to_string()))?;
        if arg_count < min || arg_count > max {
            let expected = if min == max {
                min.to_string()
            } else {
                format!("{min} to {max}")
            };
            return Err(TemplateError::Arity {
                name: name.to_string(),
                expected,
                got: arg_count,
            });
        }
        Ok(())
    }

    fn invoke(
        &self,
        name: &str,
        args: &[String],
        fields: &FieldStore,
    ) -> Result<String, TemplateError> {
        self.check(name, args.len())?;
        let arg = |i: usize| args.get(i).map(String::as_str).unwrap_or("");

        let out = match name {
            "shorten" => shorten(arg(0), count(arg(1)).unwrap_or(DEFAULT_SHORTEN)),
            "ifdef" => {
                let field = arg(0).trim();
                if !fields.is_set(field) {
                    String::new()
                } else if args.len() > 1 {
                    arg(1).to_string()
                } else {
                    fields.text(field)
                }
            }
            "ifdefempty" => pick(!fields.is_set(arg(0).trim()), arg(1), arg(2)),
            "ifdefnotempty" => pick(fields.is_set(arg(0).trim()), arg(1), arg(2)),
            "if" => pick(truthy(arg(0)), arg(1), arg(2)),
            "lower" => arg(0).to_lowercase(),
            "upper" => arg(0).to_uppercase(),
            "title" => title_case(arg(0)),
            "left" => arg(0).chars().take(count(arg(1)).unwrap_or(0)).collect(),
            "right" => {
                let n = count(arg(1)).unwrap_or(0);
                let len = arg(0).chars().count();
                arg(0).chars().skip(len.saturating_sub(n)).collect()
            }
            "asciify" => transliterate(arg(0)),
            "delchars" => arg(0).chars().filter(|c| !arg(1).contains(*c)).collect(),
            "replchars" => arg(0)
                .chars()
                .flat_map(|c| {
                    if arg(2).contains(c) {
                        arg(1).chars().collect::<Vec<_>>()
                    } else {
                        vec![c]
                    }
                })
                .collect(),
            "sanitize" => sanitize(arg(0)),
            other => return Err(TemplateError::UnknownFunction(other.to_string())),
        };
        Ok(out)
    }
}

/// At most `max` characters; never splits a code point.
pub fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    text.chars()
        .take(max)
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn count(s: &str) -> Option<usize> {
    s.trim().parse().ok()
}

fn pick(cond: bool, then: &str, otherwise: &str) -> String {
    (if cond { then } else { otherwise }).to_string()
}

fn truthy(s: &str) -> bool {
    let s = s.trim();
    !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        at_word_start = c.is_whitespace();
    }
    out
}
