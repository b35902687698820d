use std::fmt;

/// Line-oriented builder for generated source text.
///
/// Lines are stored without indentation; rendering computes the depth of
/// each line from the running balance of `{` and `}`. A line that starts
/// with `}` applies its balance before it prints, so closing braces land on
/// the level of their opening line. Blank lines render bare.
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    lines: Vec<String>,
    /// Line terminator used when rendering.
    pub newline_chars: String,
    /// Indentation unit repeated per depth level.
    pub indent_chars: String,
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            newline_chars: "\n".to_string(),
            indent_chars: "\t".to_string(),
        }
    }
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one line, unindented; depth is assigned when rendering.
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn blank_line(&mut self) {
        self.lines.push(String::new());
    }

    /// Append all lines of another builder.
    pub fn append(&mut self, other: CodeBuilder) {
        self.lines.extend(other.lines);
    }
}

impl fmt::Display for CodeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut depth: i32 = 0;
        for line in &self.lines {
            if line.is_empty() {
                f.write_str(&self.newline_chars)?;
                continue;
            }
            if line.starts_with('}') {
                depth += brace_balance(line);
                write_line(f, self, depth, line)?;
            } else {
                write_line(f, self, depth, line)?;
                depth += brace_balance(line);
            }
        }
        Ok(())
    }
}

fn write_line(
    f: &mut fmt::Formatter<'_>,
    builder: &CodeBuilder,
    depth: i32,
    line: &str,
) -> fmt::Result {
    for _ in 0..depth.max(0) {
        f.write_str(&builder.indent_chars)?;
    }
    f.write_str(line)?;
    f.write_str(&builder.newline_chars)
}

fn brace_balance(line: &str) -> i32 {
    let opens = line.chars().filter(|ch| *ch == '{').count() as i32;
    let closes = line.chars().filter(|ch| *ch == '}').count() as i32;
    opens - closes
}
