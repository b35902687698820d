//! Generic tree documents and their text form.
//!
//! A [`Document`] is one root [`Element`]; an element is a name, ordered
//! attributes and ordered child elements. There are no text nodes: the
//! interchange format is attribute-only. The text form is a small XML
//! subset — declaration line, two-space indentation, `&...;` escapes — and
//! round-trips byte-exactly through [`Document::to_xml`] and
//! [`Document::parse`].

use thiserror::Error;

/// Position-tagged failure while parsing document text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// One node of a document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Element>,
}

/// A name/value attribute; values may contain arbitrary text.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// A complete document: the UTF-8 declaration plus one root element.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Element,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Append an attribute; attribute order is preserved in the text form.
    pub fn push_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Value of the attribute with this name, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Child elements with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Render the document text: declaration line, two-space indentation,
    /// self-closing childless elements, escaped attribute values, trailing
    /// newline.
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        write_element(&mut out, &self.root, 0);
        out
    }

    /// Parse document text produced by [`Document::to_xml`] or compatible
    /// markup. Whitespace between elements, comments and the declaration are
    /// skipped; anything else outside of tags is rejected.
    pub fn parse(text: &str) -> Result<Document, ParseError> {
        let mut cursor = Cursor::new(text);
        cursor.skip_prolog()?;
        let root = cursor.parse_element()?;
        cursor.skip_trailing()?;
        Ok(Document { root })
    }
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push('<');
    out.push_str(&element.name);
    for attr in &element.attributes {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        push_escaped(out, &attr.value);
        out.push('"');
    }
    if element.children.is_empty() {
        out.push_str(" />\n");
        return;
    }
    out.push_str(">\n");
    for child in &element.children {
        write_element(out, child, depth + 1);
    }
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push_str(">\n");
}

/// Escape an attribute value. Line breaks and tabs become numeric
/// references so values survive the trip through text unchanged.
fn push_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            _ => out.push(ch),
        }
    }
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn starts_with(&self, literal: &str) -> bool {
        self.text[self.pos..].starts_with(literal)
    }

    /// Consume `literal` if the input continues with it.
    fn eat(&mut self, literal: &str) -> bool {
        if !self.starts_with(literal) {
            return false;
        }
        for _ in literal.chars() {
            self.bump();
        }
        true
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    fn expect(&mut self, ch: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(found) if found == ch => {
                self.bump();
                Ok(())
            }
            Some(found) => Err(self.error(format!("expected '{ch}', found '{found}'"))),
            None => Err(self.error(format!("expected '{ch}', found end of input"))),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.bump();
        }
    }

    fn skip_comment(&mut self) -> Result<bool, ParseError> {
        if !self.eat("<!--") {
            return Ok(false);
        }
        while !self.eat("-->") {
            if self.bump().is_none() {
                return Err(self.error("unterminated comment"));
            }
        }
        Ok(true)
    }

    /// Skip leading whitespace, an optional `<?...?>` declaration and any
    /// comments before the root element.
    fn skip_prolog(&mut self) -> Result<(), ParseError> {
        self.skip_whitespace();
        if self.eat("<?") {
            while !self.eat("?>") {
                if self.bump().is_none() {
                    return Err(self.error("unterminated declaration"));
                }
            }
        }
        loop {
            self.skip_whitespace();
            if !self.skip_comment()? {
                return Ok(());
            }
        }
    }

    fn skip_trailing(&mut self) -> Result<(), ParseError> {
        loop {
            self.skip_whitespace();
            if !self.skip_comment()? {
                break;
            }
        }
        if self.pos < self.text.len() {
            return Err(self.error("unexpected content after the root element"));
        }
        Ok(())
    }

    fn parse_name(&mut self) -> Result<String, ParseError> {
        let mut name = String::new();
        match self.peek() {
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {
                name.push(ch);
                self.bump();
            }
            _ => return Err(self.error("expected a name")),
        }
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | ':') {
                name.push(ch);
                self.bump();
            } else {
                break;
            }
        }
        Ok(name)
    }

    fn parse_element(&mut self) -> Result<Element, ParseError> {
        self.expect('<')?;
        let name = self.parse_name()?;
        let mut element = Element::new(name);

        // attributes up to the tag terminator
        loop {
            self.skip_whitespace();
            if self.eat("/>") {
                return Ok(element);
            }
            if self.eat(">") {
                break;
            }
            let attr_name = self.parse_name()?;
            if element.attr(&attr_name).is_some() {
                return Err(self.error(format!("duplicate attribute '{attr_name}'")));
            }
            self.skip_whitespace();
            self.expect('=')?;
            self.skip_whitespace();
            let value = self.parse_quoted()?;
            element.attributes.push(Attribute {
                name: attr_name,
                value,
            });
        }

        // children up to the matching closing tag
        loop {
            self.skip_whitespace();
            if self.skip_comment()? {
                continue;
            }
            if self.eat("</") {
                let closing = self.parse_name()?;
                if closing != element.name {
                    return Err(self.error(format!(
                        "mismatched closing tag: expected '</{}>', found '</{closing}>'",
                        element.name
                    )));
                }
                self.skip_whitespace();
                self.expect('>')?;
                return Ok(element);
            }
            match self.peek() {
                Some('<') => {
                    let child = self.parse_element()?;
                    element.children.push(child);
                }
                Some(_) => return Err(self.error("text content is not allowed")),
                None => return Err(self.error(format!("unclosed element '{}'", element.name))),
            }
        }
    }

    fn parse_quoted(&mut self) -> Result<String, ParseError> {
        let quote = match self.peek() {
            Some(ch @ ('"' | '\'')) => {
                self.bump();
                ch
            }
            _ => return Err(self.error("expected a quoted attribute value")),
        };
        let mut value = String::new();
        loop {
            match self.peek() {
                Some(ch) if ch == quote => {
                    self.bump();
                    return Ok(value);
                }
                Some('&') => value.push(self.parse_reference()?),
                Some('<') => return Err(self.error("'<' is not allowed in attribute values")),
                Some(ch) => {
                    value.push(ch);
                    self.bump();
                }
                None => return Err(self.error("unterminated attribute value")),
            }
        }
    }

    /// Decode one `&...;` reference, positioned at the `&`.
    fn parse_reference(&mut self) -> Result<char, ParseError> {
        self.bump();
        let mut body = String::new();
        loop {
            match self.peek() {
                Some(';') => {
                    self.bump();
                    break;
                }
                Some(ch) if body.len() < 8 => {
                    body.push(ch);
                    self.bump();
                }
                _ => return Err(self.error("unterminated character reference")),
            }
        }
        match body.as_str() {
            "amp" => Ok('&'),
            "lt" => Ok('<'),
            "gt" => Ok('>'),
            "quot" => Ok('"'),
            "apos" => Ok('\''),
            _ => {
                let code = if let Some(hex) = body.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(decimal) = body.strip_prefix('#') {
                    decimal.parse::<u32>().ok()
                } else {
                    None
                };
                code.and_then(char::from_u32)
                    .ok_or_else(|| self.error(format!("unknown character reference '&{body};'")))
            }
        }
    }
}
