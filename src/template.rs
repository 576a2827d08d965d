//! Format-string templates.
//!
//! A template mixes literal text with field references (`$name`, `${name}`)
//! and function calls (`%name{arg,...}`). Templates are parsed once into an
//! expression tree and evaluated against a [`FieldStore`] per file.

mod eval;
mod functions;
mod parse;

use thiserror::Error;

use crate::meta::FieldStore;

pub use eval::{evaluate, shell_friendly, to_relative_path};
pub use functions::{Builtins, FunctionLibrary};
pub use parse::{Template, parse};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown template function `%{0}`")]
    UnknownFunction(String),

    #[error("template function `%{name}` takes {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: String,
        got: usize,
    },

    #[error("malformed template at position {position}: {message}")]
    Syntax { position: usize, message: String },
}

/// A parsed and validated format string.
#[derive(Debug, Clone)]
pub struct PathFormat {
    source: String,
    template: Template,
}

impl PathFormat {
    /// Parse `source` and check every function it calls against `library`,
    /// so a bad format string fails before any file is touched.
    pub fn compile(source: &str, library: &dyn FunctionLibrary) -> Result<Self, TemplateError> {
        let template = parse(source)?;
        template.validate(library)?;
        Ok(Self {
            source: source.to_string(),
            template,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the relative destination path (without extension) for `fields`.
    pub fn render(
        &self,
        fields: &FieldStore,
        library: &dyn FunctionLibrary,
        shell_friendly_mode: bool,
    ) -> Result<String, TemplateError> {
        let path = to_relative_path(&evaluate(&self.template, fields, library)?);
        if shell_friendly_mode {
            Ok(to_relative_path(&shell_friendly(&path)))
        } else {
            Ok(path)
        }
    }
}

#[cfg(test)]
mod tests;
