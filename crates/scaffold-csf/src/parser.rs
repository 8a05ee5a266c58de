//! Structural CSF parser
//!
//! Reads the meta default export and the named story exports out of a
//! tree-sitter syntax tree. Nothing is evaluated; only literal values
//! (strings, string arrays, regex literals) and the presence of `play`
//! annotations are extracted.

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use regex::Regex;
use tree_sitter::{Node, Parser, Tree};

use crate::error::ParseError;
use crate::model::{StoryModule, StoryRecord};
use crate::title::TitleResolver;

/// Export keys that are never stories
const RESERVED_EXPORTS: &[&str] = &["__esModule", NAMED_EXPORTS_ORDER];

/// Export listing story keys in their intended order
const NAMED_EXPORTS_ORDER: &str = "__namedExportsOrder";

/// Max hops when following `const a = b` aliases
const MAX_ALIAS_DEPTH: usize = 8;

/// Grammar used for a story file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourceDialect {
    /// TypeScript with JSX; also accepts plain JavaScript and JSX
    #[default]
    Tsx,
    /// TypeScript without JSX, allows `<T>value` casts
    TypeScript,
}

impl SourceDialect {
    /// Pick the grammar from a file extension
    #[inline]
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.') {
            "ts" | "mts" | "cts" => SourceDialect::TypeScript,
            _ => SourceDialect::Tsx,
        }
    }

    /// Pick the grammar from a file path
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or_default()
    }

    fn language(self) -> tree_sitter::Language {
        match self {
            SourceDialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            SourceDialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }
}

/// CSF source → [`StoryModule`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CsfParser {
    dialect: SourceDialect,
}

impl CsfParser {
    /// Create parser for the default (TSX) dialect
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create parser for a specific dialect
    #[inline]
    #[must_use]
    pub fn with_dialect(dialect: SourceDialect) -> Self {
        Self { dialect }
    }

    /// Create parser suited to a file path
    #[inline]
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        Self::with_dialect(SourceDialect::from_path(path))
    }

    /// Parser dialect
    #[inline]
    #[must_use]
    pub fn dialect(&self) -> SourceDialect {
        self.dialect
    }

    /// Parse source text into a story module
    ///
    /// # Errors
    /// Returns [`ParseError`] if the source has syntax errors, lacks a default
    /// export, or its meta cannot be read.
    pub fn parse(
        &self,
        source: &str,
        titles: &dyn TitleResolver,
    ) -> Result<StoryModule, ParseError> {
        let tree = self.syntax_tree(source)?;
        let root = tree.root_node();
        if root.has_error() {
            return Err(first_error(root, source));
        }

        let scan = ModuleScan::collect(root, source)?;
        let module = scan.into_module(titles)?;
        tracing::debug!(
            title = ?module.title(),
            stories = module.stories().len(),
            "parsed story module"
        );
        Ok(module)
    }

    fn syntax_tree(&self, source: &str) -> Result<Tree, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.dialect.language())
            .map_err(|e| ParseError::ParserInit(e.to_string()))?;
        parser.parse(source, None).ok_or(ParseError::ParseFailed)
    }
}

/// Story annotations gathered before filtering
#[derive(Debug, Default)]
struct StoryDraft {
    tags: Option<Vec<String>>,
    play: bool,
}

/// Which stories the meta exposes
#[derive(Debug)]
enum StoryFilter {
    Keys(Vec<String>),
    Pattern(Regex),
}

impl StoryFilter {
    fn matches(&self, key: &str) -> bool {
        match self {
            StoryFilter::Keys(keys) => keys.iter().any(|k| k == key),
            StoryFilter::Pattern(re) => re.is_match(key),
        }
    }
}

struct ModuleScan<'a> {
    source: &'a str,
    bindings: HashMap<&'a str, Node<'a>>,
    meta: Option<Node<'a>>,
    stories: IndexMap<String, StoryDraft>,
    /// local binding → exported key
    exported_as: HashMap<String, String>,
    named_order: Option<Vec<String>>,
}

impl<'a> ModuleScan<'a> {
    fn collect(root: Node<'a>, source: &'a str) -> Result<Self, ParseError> {
        let mut scan = Self {
            source,
            bindings: HashMap::new(),
            meta: None,
            stories: IndexMap::new(),
            exported_as: HashMap::new(),
            named_order: None,
        };

        let mut cursor = root.walk();
        let statements: Vec<Node<'a>> = root.named_children(&mut cursor).collect();

        for &stmt in &statements {
            match stmt.kind() {
                "lexical_declaration" | "variable_declaration" => scan.bind_declarators(stmt),
                "export_statement" => {
                    if let Some(decl) = stmt.child_by_field_name("declaration") {
                        scan.bind_declarators(decl);
                    }
                }
                _ => {}
            }
        }

        for &stmt in &statements {
            if stmt.kind() == "export_statement" {
                scan.visit_export(stmt)?;
            }
        }

        for &stmt in &statements {
            if stmt.kind() == "expression_statement" {
                scan.visit_assignment(stmt);
            }
        }

        Ok(scan)
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    fn bind_declarators(&mut self, decl: Node<'a>) {
        if !matches!(decl.kind(), "lexical_declaration" | "variable_declaration") {
            return;
        }
        let mut cursor = decl.walk();
        for declarator in decl.named_children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let (Some(name), Some(value)) = (
                declarator.child_by_field_name("name"),
                declarator.child_by_field_name("value"),
            ) else {
                continue;
            };
            if name.kind() == "identifier" {
                self.bindings.insert(self.text(name), value);
            }
        }
    }

    fn visit_export(&mut self, stmt: Node<'a>) -> Result<(), ParseError> {
        if has_token(stmt, "default") {
            let target = stmt
                .child_by_field_name("value")
                .or_else(|| stmt.child_by_field_name("declaration"));
            if let Some(target) = target {
                self.meta = Some(target);
            }
            return Ok(());
        }

        // Re-exports from other modules are not stories of this module
        if stmt.child_by_field_name("source").is_some() {
            return Ok(());
        }

        if let Some(decl) = stmt.child_by_field_name("declaration") {
            match decl.kind() {
                "lexical_declaration" | "variable_declaration" => {
                    let mut cursor = decl.walk();
                    for declarator in decl.named_children(&mut cursor) {
                        if declarator.kind() != "variable_declarator" {
                            continue;
                        }
                        let Some(name) = declarator.child_by_field_name("name") else {
                            continue;
                        };
                        if name.kind() != "identifier" {
                            continue;
                        }
                        let key = self.text(name);
                        self.add_export(key, key, declarator.child_by_field_name("value"));
                    }
                }
                "function_declaration" | "generator_function_declaration" => {
                    if let Some(name) = decl.child_by_field_name("name") {
                        let key = self.text(name);
                        self.add_story(key, key, StoryDraft::default());
                    }
                }
                _ => {}
            }
            return Ok(());
        }

        let mut cursor = stmt.walk();
        let clauses: Vec<Node<'a>> = stmt
            .named_children(&mut cursor)
            .filter(|n| n.kind() == "export_clause")
            .collect();
        for clause in clauses {
            let mut inner = clause.walk();
            for specifier in clause.named_children(&mut inner) {
                if specifier.kind() != "export_specifier" {
                    continue;
                }
                let Some(local) = specifier.child_by_field_name("name") else {
                    continue;
                };
                let local = self.text(local);
                let exported = specifier
                    .child_by_field_name("alias")
                    .map_or(local, |alias| self.text(alias));

                if exported == "default" {
                    self.meta = self.bindings.get(local).copied();
                    if self.meta.is_none() {
                        return Err(ParseError::InvalidMeta(format!("unbound '{local}'")));
                    }
                    continue;
                }
                self.add_export(local, exported, self.bindings.get(local).copied());
            }
        }
        Ok(())
    }

    fn add_export(&mut self, local: &str, exported: &str, value: Option<Node<'a>>) {
        if exported == NAMED_EXPORTS_ORDER {
            let order = value.map(|v| self.string_array(v));
            self.named_order = order;
            return;
        }
        let draft = self.draft_from(value);
        self.add_story(local, exported, draft);
    }

    fn add_story(&mut self, local: &str, exported: &str, draft: StoryDraft) {
        self.exported_as.insert(local.to_string(), exported.to_string());
        self.stories.insert(exported.to_string(), draft);
    }

    /// `Story.play = ...`, `Story.tags = [...]`, `Story.story = { ... }`
    fn visit_assignment(&mut self, stmt: Node<'a>) {
        let Some(expr) = stmt.named_child(0) else {
            return;
        };
        if expr.kind() != "assignment_expression" {
            return;
        }
        let (Some(left), Some(right)) = (
            expr.child_by_field_name("left"),
            expr.child_by_field_name("right"),
        ) else {
            return;
        };
        if left.kind() != "member_expression" {
            return;
        }
        let (Some(object), Some(property)) = (
            left.child_by_field_name("object"),
            left.child_by_field_name("property"),
        ) else {
            return;
        };
        let Some(key) = self.exported_as.get(self.text(object)).cloned() else {
            return;
        };

        match self.text(property) {
            "play" => {
                if let Some(draft) = self.stories.get_mut(&key) {
                    draft.play = true;
                }
            }
            "tags" => {
                let tags = self.string_array(right);
                if let Some(draft) = self.stories.get_mut(&key) {
                    draft.tags = Some(tags);
                }
            }
            "story" => {
                let nested = self.draft_from(Some(right));
                if let Some(draft) = self.stories.get_mut(&key) {
                    draft.play |= nested.play;
                    if nested.tags.is_some() {
                        draft.tags = nested.tags;
                    }
                }
            }
            _ => {}
        }
    }

    fn draft_from(&self, value: Option<Node<'a>>) -> StoryDraft {
        let mut draft = StoryDraft::default();
        let Some(object) = value.map(|v| self.resolve(v)).filter(|v| v.kind() == "object")
        else {
            return draft;
        };
        for (name, value) in self.properties(object) {
            match name {
                "tags" => draft.tags = Some(self.string_array(value)),
                "play" => draft.play = true,
                _ => {}
            }
        }
        draft
    }

    /// Strip TS wrappers and follow identifiers to their initializer
    fn resolve(&self, mut node: Node<'a>) -> Node<'a> {
        for _ in 0..MAX_ALIAS_DEPTH {
            match node.kind() {
                "parenthesized_expression" | "satisfies_expression" | "as_expression"
                | "non_null_expression" | "type_assertion" => {
                    let Some(inner) = node.named_child(0) else {
                        break;
                    };
                    node = inner;
                }
                "identifier" | "shorthand_property_identifier" => {
                    match self.bindings.get(self.text(node)) {
                        Some(&bound) => node = bound,
                        None => break,
                    }
                }
                _ => break,
            }
        }
        node
    }

    fn properties(&self, object: Node<'a>) -> Vec<(&'a str, Node<'a>)> {
        let mut cursor = object.walk();
        object
            .named_children(&mut cursor)
            .filter_map(|prop| match prop.kind() {
                "pair" => {
                    let key = prop.child_by_field_name("key")?;
                    let value = prop.child_by_field_name("value")?;
                    let name = match key.kind() {
                        "property_identifier" => self.text(key),
                        "string" => strip_delimiters(self.text(key)),
                        _ => return None,
                    };
                    Some((name, value))
                }
                "method_definition" => {
                    let name = prop.child_by_field_name("name")?;
                    Some((self.text(name), prop))
                }
                "shorthand_property_identifier" => Some((self.text(prop), prop)),
                _ => None,
            })
            .collect()
    }

    fn string_value(&self, node: Node<'a>) -> Option<String> {
        let node = self.resolve(node);
        match node.kind() {
            "string" => Some(unescape(strip_delimiters(self.text(node)))),
            "template_string" => {
                let mut cursor = node.walk();
                let interpolated = node
                    .named_children(&mut cursor)
                    .any(|c| c.kind() == "template_substitution");
                (!interpolated).then(|| unescape(strip_delimiters(self.text(node))))
            }
            _ => None,
        }
    }

    fn string_array(&self, node: Node<'a>) -> Vec<String> {
        let node = self.resolve(node);
        if node.kind() != "array" {
            tracing::debug!(kind = node.kind(), "ignoring non-array tags");
            return Vec::new();
        }
        let mut cursor = node.walk();
        let elements: Vec<Node<'a>> = node.named_children(&mut cursor).collect();
        elements
            .into_iter()
            .filter_map(|element| self.string_value(element))
            .collect()
    }

    fn story_filter(
        &self,
        node: Node<'a>,
        property: &'static str,
    ) -> Result<StoryFilter, ParseError> {
        let node = self.resolve(node);
        match node.kind() {
            "array" => Ok(StoryFilter::Keys(self.string_array(node))),
            "regex" => {
                let pattern = node
                    .child_by_field_name("pattern")
                    .map_or("", |p| self.text(p));
                let flags = node.child_by_field_name("flags").map_or("", |f| self.text(f));
                let pattern = if flags.contains('i') {
                    format!("(?i){pattern}")
                } else {
                    pattern.to_string()
                };
                Regex::new(&pattern)
                    .map(StoryFilter::Pattern)
                    .map_err(|e| ParseError::InvalidStoryFilter {
                        property,
                        found: e.to_string(),
                    })
            }
            "string" | "template_string" => {
                let pattern = self.string_value(node).unwrap_or_default();
                Regex::new(&pattern)
                    .map(StoryFilter::Pattern)
                    .map_err(|e| ParseError::InvalidStoryFilter {
                        property,
                        found: e.to_string(),
                    })
            }
            other => Err(ParseError::InvalidStoryFilter {
                property,
                found: other.to_string(),
            }),
        }
    }

    fn into_module(self, titles: &dyn TitleResolver) -> Result<StoryModule, ParseError> {
        let meta = self.meta.ok_or(ParseError::MissingDefaultExport)?;
        let meta = self.resolve(meta);
        if meta.kind() != "object" {
            return Err(ParseError::InvalidMeta(meta.kind().to_string()));
        }

        let mut user_title = None;
        let mut default_tags = Vec::new();
        let mut include = None;
        let mut exclude = None;
        for (name, value) in self.properties(meta) {
            match name {
                "title" => user_title = self.string_value(value),
                "tags" => default_tags = self.string_array(value),
                "includeStories" => include = Some(self.story_filter(value, "includeStories")?),
                "excludeStories" => exclude = Some(self.story_filter(value, "excludeStories")?),
                _ => {}
            }
        }

        let title = titles.resolve(user_title.as_deref());
        let mut module = StoryModule::new(title).with_default_tags(default_tags);

        let stories = match self.named_order.as_deref() {
            Some(order) => in_named_order(self.stories, order),
            None => self.stories,
        };
        for (key, draft) in stories {
            let exposed = !RESERVED_EXPORTS.contains(&key.as_str())
                && include.as_ref().map_or(true, |f| f.matches(&key))
                && !exclude.as_ref().is_some_and(|f| f.matches(&key));
            if !exposed {
                tracing::trace!(export = %key, "export is not a story");
                continue;
            }
            module.push_story(
                StoryRecord::new(key)
                    .with_tags(draft.tags.unwrap_or_default())
                    .with_play_function(draft.play),
            );
        }
        Ok(module)
    }
}

/// Listed keys first, in list order, then unlisted ones in declaration order
fn in_named_order(
    mut stories: IndexMap<String, StoryDraft>,
    order: &[String],
) -> IndexMap<String, StoryDraft> {
    let mut sorted = IndexMap::with_capacity(stories.len());
    for key in order {
        if let Some((key, draft)) = stories.shift_remove_entry(key.as_str()) {
            sorted.insert(key, draft);
        }
    }
    if !stories.is_empty() {
        tracing::debug!(
            unlisted = ?stories.keys().collect::<Vec<_>>(),
            "exports missing from __namedExportsOrder"
        );
    }
    sorted.extend(stories);
    sorted
}

fn has_token(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| !c.is_named() && c.kind() == kind);
    found
}

fn first_error(root: Node<'_>, source: &str) -> ParseError {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_missing() {
            let pos = node.start_position();
            return ParseError::syntax(pos.row, pos.column, format!("missing {}", node.kind()));
        }
        if node.is_error() {
            let pos = node.start_position();
            let snippet: String = source
                .get(node.byte_range())
                .unwrap_or("")
                .chars()
                .take(40)
                .collect();
            return ParseError::syntax(pos.row, pos.column, format!("unexpected `{snippet}`"));
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node
            .children(&mut cursor)
            .filter(|c| c.has_error() || c.is_missing())
            .collect();
        stack.extend(children.into_iter().rev());
    }
    let pos = root.start_position();
    ParseError::syntax(pos.row, pos.column, "invalid source")
}

fn strip_delimiters(quoted: &str) -> &str {
    let mut chars = quoted.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

/// Decode JS string escapes; malformed numeric escapes are kept verbatim
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('\r') => {
                chars.next_if_eq(&'\n');
            }
            Some('\n' | '\u{2028}' | '\u{2029}') => {}
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, &hex, 'x');
            }
            Some('u') if chars.next_if_eq(&'{').is_some() => {
                let mut hex = String::new();
                let mut closed = false;
                for h in chars.by_ref() {
                    if h == '}' {
                        closed = true;
                        break;
                    }
                    hex.push(h);
                }
                if closed {
                    push_code_point(&mut out, &hex, 'u');
                } else {
                    out.push_str("\\u{");
                    out.push_str(&hex);
                }
            }
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let high = u32::from_str_radix(&hex, 16).ok().filter(|_| hex.len() == 4);
                match high {
                    Some(high @ 0xD800..=0xDBFF) => {
                        let low = surrogate_pair_low(&mut chars);
                        match low.and_then(|low| {
                            char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
                        }) {
                            Some(ch) => out.push(ch),
                            None => out.push(char::REPLACEMENT_CHARACTER),
                        }
                    }
                    _ => push_code_point(&mut out, &hex, 'u'),
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Consume a trailing `\uDC00`..`\uDFFF` escape if one follows
fn surrogate_pair_low(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<u32> {
    let mut ahead = chars.clone();
    if ahead.next()? != '\\' || ahead.next()? != 'u' {
        return None;
    }
    let hex: String = ahead.by_ref().take(4).collect();
    let low = u32::from_str_radix(&hex, 16)
        .ok()
        .filter(|low| hex.len() == 4 && (0xDC00..=0xDFFF).contains(low))?;
    *chars = ahead;
    Some(low)
}

fn push_code_point(out: &mut String, hex: &str, kind: char) {
    let decoded = u32::from_str_radix(hex, 16)
        .ok()
        .filter(|_| hex.chars().all(|h| h.is_ascii_hexdigit()))
        .and_then(char::from_u32);
    match decoded {
        Some(ch) if kind != 'x' || hex.len() == 2 => out.push(ch),
        _ => {
            out.push('\\');
            out.push(kind);
            out.push_str(hex);
        }
    }
}
