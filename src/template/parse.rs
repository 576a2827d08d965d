use super::TemplateError;
use super::functions::FunctionLibrary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(String),
    /// `$name` or `${name}`.
    Field(String),
    /// `%name{arg,...}`; each argument is itself a template.
    Call { name: String, args: Vec<Template> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    pub parts: Vec<Expr>,
}

impl Template {
    /// Check every call (including nested ones) against `library`.
    pub fn validate(&self, library: &dyn FunctionLibrary) -> Result<(), TemplateError> {
        for part in &self.parts {
            if let Expr::Call { name, args } = part {
                library.check(name, args.len())?;
                for arg in args {
                    arg.validate(library)?;
                }
            }
        }
        Ok(())
    }
}

/// Parse a format string into a [`Template`].
pub fn parse(source: &str) -> Result<Template, TemplateError> {
    let mut parser = Parser {
        chars: source.chars().collect(),
        pos: 0,
    };
    let template = parser.sequence(false)?;
    // At top level `,` and `}` are plain text, so the whole input is consumed.
    debug_assert!(parser.peek().is_none());
    Ok(template)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn error(&self, position: usize, message: &str) -> TemplateError {
        TemplateError::Syntax {
            position,
            message: message.to_string(),
        }
    }

    /// Parse text and substitutions until end of input, or until an argument
    /// delimiter when inside a function call.
    fn sequence(&mut self, in_args: bool) -> Result<Template, TemplateError> {
        let mut parts = Vec::new();
        let mut literal = String::new();

        while let Some(c) = self.peek() {
            match c {
                ',' | '}' if in_args => break,
                '$' => {
                    if let Some(expr) = self.dollar(&mut literal)? {
                        flush(&mut parts, &mut literal);
                        parts.push(expr);
                    }
                }
                '%' => {
                    if let Some(expr) = self.call()? {
                        flush(&mut parts, &mut literal);
                        parts.push(expr);
                    } else {
                        literal.push('%');
                        self.pos += 1;
                    }
                }
                _ => {
                    literal.push(c);
                    self.pos += 1;
                }
            }
        }

        flush(&mut parts, &mut literal);
        Ok(Template { parts })
    }

    /// Handle a `$`: escape, braced field, bare field or a lone dollar sign.
    /// Escapes and lone dollars are appended to `literal`.
    fn dollar(&mut self, literal: &mut String) -> Result<Option<Expr>, TemplateError> {
        let start = self.pos;
        self.pos += 1;
        match self.peek() {
            Some(c @ ('$' | '%' | ',' | '}')) => {
                literal.push(c);
                self.pos += 1;
                Ok(None)
            }
            Some('{') => {
                self.pos += 1;
                let name_start = self.pos;
                while let Some(c) = self.peek() {
                    if c == '}' {
                        break;
                    }
                    if !(c.is_ascii_alphanumeric() || c == '_') {
                        return Err(self.error(self.pos, "invalid character in `${...}`"));
                    }
                    self.pos += 1;
                }
                if self.peek().is_none() {
                    return Err(self.error(start, "unclosed `${`"));
                }
                let name: String = self.chars[name_start..self.pos].iter().collect();
                self.pos += 1;
                if name.is_empty() {
                    return Err(self.error(start, "empty field name"));
                }
                Ok(Some(Expr::Field(name)))
            }
            Some(c) if c.is_ascii_alphanumeric() => Ok(Some(Expr::Field(self.identifier()))),
            _ => {
                literal.push('$');
                Ok(None)
            }
        }
    }

    /// Parse `%name{...}` at the current position. Returns `None` without
    /// consuming anything when the `%` does not start a call.
    fn call(&mut self) -> Result<Option<Expr>, TemplateError> {
        let start = self.pos;
        self.pos += 1;
        if !self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
            self.pos = start;
            return Ok(None);
        }
        let name = self.identifier();
        if self.peek() != Some('{') {
            self.pos = start;
            return Ok(None);
        }
        self.pos += 1;

        let mut args = Vec::new();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(Some(Expr::Call { name, args }));
        }
        loop {
            args.push(self.sequence(true)?);
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.error(start, &format!("unclosed `%{name}{{`"))),
            }
        }
        Ok(Some(Expr::Call { name, args }))
    }

    /// ASCII letters and digits; `_` only between two of them, so that
    /// `$album_$year` reads `album` followed by a literal `_`.
    fn identifier(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            let continues = c.is_ascii_alphanumeric()
                || (c == '_'
                    && self.pos > start
                    && self.peek_at(1).is_some_and(|n| n.is_ascii_alphanumeric()));
            if !continues {
                break;
            }
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }
}

fn flush(parts: &mut Vec<Expr>, literal: &mut String) {
    if !literal.is_empty() {
        parts.push(Expr::Literal(std::mem::take(literal)));
    }
}
