//! Rendering the test tree to JavaScript
//!
//! [`JsRenderer`] emits Jest-style `describe` / `it` / `beforeEach` calls.
//! Labels are JSON-escaped, which is always a valid JS string literal.

use crate::strategy::Body;
use crate::tree::{TestCase, TestGroup, TestNode};

/// Serializes a test tree into source text
pub trait Renderer {
    /// Render a group and everything below it
    fn render(&self, root: &TestGroup) -> String;

    /// Render a group so it only registers when the module is loaded as a
    /// test file, never when it is run directly as the program entry point
    fn render_guarded(&self, root: &TestGroup) -> String;
}

/// Jest-compatible JavaScript renderer
#[derive(Debug, Clone)]
pub struct JsRenderer {
    indent: usize,
}

impl Default for JsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl JsRenderer {
    /// Two-space indentation
    pub const DEFAULT: JsRenderer = JsRenderer { indent: 2 };

    /// Create renderer with two-space indentation
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::DEFAULT
    }

    /// Create renderer with `width` spaces per nesting level
    #[inline]
    #[must_use]
    pub fn with_indent(width: usize) -> Self {
        Self { indent: width }
    }

    fn pad(&self, depth: usize) -> String {
        " ".repeat(self.indent * depth)
    }

    fn node(&self, node: &TestNode, depth: usize, out: &mut String) {
        match node {
            TestNode::Group(group) => self.group(group, depth, out),
            TestNode::Case(case) => self.case(case, depth, out),
            TestNode::Setup(body) => self.callback("beforeEach(", body, depth, out),
        }
    }

    fn group(&self, group: &TestGroup, depth: usize, out: &mut String) {
        let pad = self.pad(depth);
        let callee = if group.is_skipped() { "describe.skip" } else { "describe" };
        let label = js_string(group.label());
        if group.children().is_empty() {
            out.push_str(&format!("{pad}{callee}({label}, () => {{}});\n"));
            return;
        }
        out.push_str(&format!("{pad}{callee}({label}, () => {{\n"));
        for child in group.children() {
            self.node(child, depth + 1, out);
        }
        out.push_str(&format!("{pad}}});\n"));
    }

    fn case(&self, case: &TestCase, depth: usize, out: &mut String) {
        let callee = if case.is_skipped() { "it.skip" } else { "it" };
        let head = format!("{callee}({}, ", js_string(case.label()));
        self.callback(&head, case.body(), depth, out);
    }

    /// `head` is everything before the callback, e.g. `it("x", `
    fn callback(&self, head: &str, body: &Body, depth: usize, out: &mut String) {
        let pad = self.pad(depth);
        if body.is_empty() {
            out.push_str(&format!("{pad}{head}() => {{}});\n"));
            return;
        }
        out.push_str(&format!("{pad}{head}async () => {{\n"));
        self.body(body, depth + 1, out);
        out.push_str(&format!("{pad}}});\n"));
    }

    /// Lines continuing a string or template literal are copied as-is
    fn body(&self, body: &Body, depth: usize, out: &mut String) {
        let pad = self.pad(depth);
        for statement in body.statements() {
            let statement = statement.strip_suffix('\n').unwrap_or(statement);
            let literal = literal_continuations(statement);
            for (line, in_literal) in statement.split('\n').zip(literal) {
                if in_literal {
                    out.push_str(line);
                } else if !line.trim().is_empty() {
                    out.push_str(&pad);
                    out.push_str(line);
                }
                out.push('\n');
            }
        }
    }
}

/// Lexical position while scanning a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexical {
    Code,
    Quote(char),
    Template,
    LineComment,
    BlockComment,
}

/// For each line of `statement`, whether it starts inside a string or
/// template literal
fn literal_continuations(statement: &str) -> Vec<bool> {
    let mut starts = vec![false];
    let mut state = Lexical::Code;
    // brace depth at which each open `${` substitution closes
    let mut substitutions: Vec<usize> = Vec::new();
    let mut braces = 0usize;
    let mut chars = statement.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            Lexical::Code => match c {
                '\'' | '"' => state = Lexical::Quote(c),
                '`' => state = Lexical::Template,
                '/' if chars.peek() == Some(&'/') => state = Lexical::LineComment,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = Lexical::BlockComment;
                }
                '{' => braces += 1,
                '}' if substitutions.last() == Some(&braces) => {
                    substitutions.pop();
                    state = Lexical::Template;
                }
                '}' => braces = braces.saturating_sub(1),
                _ => {}
            },
            Lexical::Quote(quote) => {
                if c == '\\' {
                    if chars.next() == Some('\n') {
                        starts.push(true);
                    }
                    continue;
                }
                if c == quote {
                    state = Lexical::Code;
                }
            }
            Lexical::Template => match c {
                '\\' => {
                    if chars.next() == Some('\n') {
                        starts.push(true);
                    }
                    continue;
                }
                '`' => state = Lexical::Code,
                '$' if chars.peek() == Some(&'{') => {
                    chars.next();
                    substitutions.push(braces);
                    state = Lexical::Code;
                }
                _ => {}
            },
            Lexical::LineComment => {
                if c == '\n' {
                    state = Lexical::Code;
                }
            }
            Lexical::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = Lexical::Code;
                }
            }
        }
        if c == '\n' {
            starts.push(matches!(state, Lexical::Template | Lexical::Quote(_)));
        }
    }
    starts
}

impl Renderer for JsRenderer {
    fn render(&self, root: &TestGroup) -> String {
        let mut out = String::new();
        self.group(root, 0, &mut out);
        out
    }

    fn render_guarded(&self, root: &TestGroup) -> String {
        let mut out = String::from("if (!require.main) {\n");
        self.group(root, 1, &mut out);
        out.push_str("}\n");
        out
    }
}

/// Double-quoted JavaScript string literal
#[must_use]
pub fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}
