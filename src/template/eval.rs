use any_ascii::any_ascii;

use crate::meta::FieldStore;

use super::TemplateError;
use super::functions::FunctionLibrary;
use super::parse::{Expr, Template};

/// Evaluate `template` against `fields`, left to right. Function arguments are
/// fully evaluated before the function runs.
///
/// Unknown fields render empty. Field values never contribute a path
/// separator; only literal text in the template can.
pub fn evaluate(
    template: &Template,
    fields: &FieldStore,
    library: &dyn FunctionLibrary,
) -> Result<String, TemplateError> {
    let mut out = String::new();
    for part in &template.parts {
        match part {
            Expr::Literal(text) => out.push_str(text),
            Expr::Field(name) => out.push_str(&field_text(fields, name)),
            Expr::Call { name, args } => {
                let args = args
                    .iter()
                    .map(|arg| evaluate(arg, fields, library))
                    .collect::<Result<Vec<_>, _>>()?;
                out.push_str(&library.invoke(name, &args, fields)?);
            }
        }
    }
    Ok(out)
}

fn field_text(fields: &FieldStore, name: &str) -> String {
    fields.text(name).replace(['/', '\\'], "_")
}

/// Normalize a rendered template into a relative path: segments are trimmed,
/// empty segments dropped and `.`/`..` neutralized so the result can never
/// leave the target directory.
pub fn to_relative_path(rendered: &str) -> String {
    rendered
        .split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment {
            "." | ".." => "_",
            other => other,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// ASCII transliteration of a single path segment. Look-alike slashes such as
/// `⁄` or `∕` transliterate to `/`, so any separator produced here becomes `_`.
pub(crate) fn transliterate(segment: &str) -> String {
    any_ascii(segment).replace(['/', '\\'], "_")
}

/// Shell-friendly rendition of a path: ASCII only, no quoting-prone
/// punctuation, underscores instead of whitespace. Segments are converted one
/// by one so the number of directories never changes.
pub fn shell_friendly(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            transliterate(segment)
                .chars()
                .filter(|c| !matches!(c, '(' | ')' | '.' | ',' | '!' | '"' | '\''))
                .map(|c| if c.is_whitespace() { '_' } else { c })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("/")
}
