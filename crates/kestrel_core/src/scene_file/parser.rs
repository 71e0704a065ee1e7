//! Scene file reader.
//!
//! Turns scene file text into an [`Element`] tree. The reader handles the
//! subset of XML that scene files use:
//!
//! - `<?xml ... ?>` declarations and `<!DOCTYPE ...>` (skipped)
//! - `<!-- comments -->` anywhere between elements
//! - `<tag attr="value" attr='value'>` ... `</tag>` and `<tag ... />`
//! - the five predefined entities in attribute values
//!
//! Character data between tags is ignored.

use thiserror::Error;

use super::types::Element;

/// Errors that can occur while reading a scene file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Unexpected end of file")]
    UnexpectedEof,

    #[error("Unclosed element <{name}> starting at line {line}")]
    UnclosedElement { name: String, line: usize },

    #[error("Mismatched closing tag at line {line}: expected </{expected}>, found </{found}>")]
    MismatchedTag {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("Missing attribute '{attribute}' on <{element}> at line {line}")]
    MissingAttribute {
        element: String,
        attribute: String,
        line: usize,
    },

    #[error("Invalid number format at line {line}: {value:?}")]
    InvalidNumber { value: String, line: usize },

    #[error("Invalid vector at line {line}: {value:?}")]
    InvalidVector { value: String, line: usize },

    #[error("Expected <scene> root element, found <{0}>")]
    UnexpectedRoot(String),

    #[error("Scene has no camera")]
    MissingCamera,
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Cursor over scene file text.
pub struct XmlReader<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> XmlReader<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
        }
    }

    /// Read the single root element of a document.
    pub fn parse_document(&mut self) -> ParseResult<Element> {
        self.skip_misc()?;
        if self.at_end() {
            return Err(ParseError::UnexpectedEof);
        }

        let root = self.parse_element()?;

        self.skip_misc()?;
        if !self.at_end() {
            return Err(self.syntax("content after the root element"));
        }

        Ok(root)
    }

    fn parse_element(&mut self) -> ParseResult<Element> {
        let line = self.line;
        self.expect('<')?;
        let mut element = Element::new(self.read_name()?, line);

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('/') => {
                    self.bump();
                    self.expect('>')?;
                    return Ok(element);
                }
                Some('>') => {
                    self.bump();
                    break;
                }
                Some(_) => {
                    let key = self.read_name()?;
                    self.skip_whitespace();
                    self.expect('=')?;
                    self.skip_whitespace();
                    let value = self.read_quoted()?;
                    element.attributes.push((key, value));
                }
                None => {
                    return Err(ParseError::UnclosedElement {
                        name: element.name,
                        line,
                    })
                }
            }
        }

        loop {
            self.skip_text();
            if self.at_end() {
                return Err(ParseError::UnclosedElement {
                    name: element.name,
                    line,
                });
            }

            if self.rest().starts_with("<!--") {
                self.skip_comment()?;
            } else if self.rest().starts_with("</") {
                let close_line = self.line;
                self.pos += 2;
                let found = self.read_name()?;
                self.skip_whitespace();
                self.expect('>')?;
                if found != element.name {
                    return Err(ParseError::MismatchedTag {
                        expected: element.name,
                        found,
                        line: close_line,
                    });
                }
                return Ok(element);
            } else {
                element.children.push(self.parse_element()?);
            }
        }
    }

    /// Whitespace, comments, declarations and doctypes outside the root.
    fn skip_misc(&mut self) -> ParseResult<()> {
        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.starts_with("<!--") {
                self.skip_comment()?;
            } else if rest.starts_with("<?") {
                self.skip_past("?>")?;
            } else if rest.starts_with("<!") {
                self.skip_past(">")?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_comment(&mut self) -> ParseResult<()> {
        let line = self.line;
        self.skip_past("-->").map_err(|_| ParseError::Syntax {
            line,
            message: "unterminated comment".to_string(),
        })
    }

    /// Advance past the next occurrence of `pattern`.
    fn skip_past(&mut self, pattern: &str) -> ParseResult<()> {
        match self.rest().find(pattern) {
            Some(offset) => {
                let end = self.pos + offset + pattern.len();
                self.line += self.src[self.pos..end].matches('\n').count();
                self.pos = end;
                Ok(())
            }
            None => Err(ParseError::UnexpectedEof),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.bump();
        }
    }

    fn skip_text(&mut self) {
        while let Some(c) = self.peek() {
            if c == '<' {
                break;
            }
            self.bump();
        }
    }

    fn read_name(&mut self) -> ParseResult<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.') {
                self.bump();
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(match self.peek() {
                Some(c) => self.syntax(&format!("expected a name, found {c:?}")),
                None => ParseError::UnexpectedEof,
            });
        }

        Ok(self.src[start..self.pos].to_string())
    }

    fn read_quoted(&mut self) -> ParseResult<String> {
        let quote = match self.peek() {
            Some(c @ ('"' | '\'')) => c,
            Some(c) => return Err(self.syntax(&format!("expected a quoted value, found {c:?}"))),
            None => return Err(ParseError::UnexpectedEof),
        };
        self.bump();

        let start = self.pos;
        loop {
            match self.peek() {
                Some(c) if c == quote => break,
                Some(_) => self.bump(),
                None => return Err(ParseError::UnexpectedEof),
            }
        }
        let raw = &self.src[start..self.pos];
        self.bump();

        Ok(decode_entities(raw))
    }

    fn expect(&mut self, expected: char) -> ParseResult<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.syntax(&format!("expected {expected:?}, found {c:?}"))),
            None => Err(ParseError::UnexpectedEof),
        }
    }

    #[inline]
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    #[inline]
    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            if c == '\n' {
                self.line += 1;
            }
            self.pos += c.len_utf8();
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn syntax(&self, message: &str) -> ParseError {
        ParseError::Syntax {
            line: self.line,
            message: message.to_string(),
        }
    }
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Parse a whole document into its root element.
pub fn parse_elements(content: &str) -> ParseResult<Element> {
    XmlReader::new(content).parse_document()
}
