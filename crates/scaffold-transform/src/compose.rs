//! Document composition
//!
//! Stitches the (optionally cleared) original source together with the
//! rendered scaffold, or falls back to a skipped placeholder group when
//! nothing qualifies and the caller asked for one.

use scaffold_csf::{CsfParser, IdentityTitle, StoryModule, TitleResolver};

use crate::assembler::ScaffoldAssembler;
use crate::error::TransformResult;
use crate::identity::{CsfIdentity, IdentityResolver};
use crate::policy::TagPolicy;
use crate::render::{JsRenderer, Renderer};
use crate::strategy::{Body, ModuleSetupStrategy, TestBodyStrategy};
use crate::tree::{TestCase, TestGroup};

/// Label of the placeholder case
const PLACEHOLDER_CASE: &str = "no-op";

/// Per-transform options
#[derive(Clone, Copy)]
pub struct TransformOptions<'a> {
    /// Omit the original source from the output
    pub clear_body: bool,
    /// Emit a skipped placeholder group when no tree is produced
    pub insert_test_if_empty: bool,
    /// Remaps the declared title before any label or id is computed
    pub title_override: Option<&'a dyn TitleResolver>,
    /// Builds each story's test body
    pub test_body: &'a dyn TestBodyStrategy,
    /// Builds the module-level setup body
    pub module_setup: Option<&'a dyn ModuleSetupStrategy>,
    /// Include / exclude / skip tags
    pub tag_policy: &'a TagPolicy,
}

impl std::fmt::Debug for TransformOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformOptions")
            .field("clear_body", &self.clear_body)
            .field("insert_test_if_empty", &self.insert_test_if_empty)
            .field("has_title_override", &self.title_override.is_some())
            .field("has_module_setup", &self.module_setup.is_some())
            .field("tag_policy", self.tag_policy)
            .finish_non_exhaustive()
    }
}

static EMPTY_POLICY: TagPolicy = TagPolicy::EMPTY;

impl<'a> TransformOptions<'a> {
    /// Create options with defaults and the required body strategy
    #[inline]
    #[must_use]
    pub fn new(test_body: &'a dyn TestBodyStrategy) -> Self {
        Self {
            clear_body: false,
            insert_test_if_empty: false,
            title_override: None,
            test_body,
            module_setup: None,
            tag_policy: &EMPTY_POLICY,
        }
    }

    /// With clear body
    #[inline]
    #[must_use]
    pub fn with_clear_body(mut self, clear: bool) -> Self {
        self.clear_body = clear;
        self
    }

    /// With placeholder insertion
    #[inline]
    #[must_use]
    pub fn with_insert_test_if_empty(mut self, insert: bool) -> Self {
        self.insert_test_if_empty = insert;
        self
    }

    /// With title override
    #[inline]
    #[must_use]
    pub fn with_title_override(mut self, resolver: &'a dyn TitleResolver) -> Self {
        self.title_override = Some(resolver);
        self
    }

    /// With module setup strategy
    #[inline]
    #[must_use]
    pub fn with_module_setup(mut self, setup: &'a dyn ModuleSetupStrategy) -> Self {
        self.module_setup = Some(setup);
        self
    }

    /// With tag policy
    #[inline]
    #[must_use]
    pub fn with_tag_policy(mut self, policy: &'a TagPolicy) -> Self {
        self.tag_policy = policy;
        self
    }
}

/// Drives parse → assemble → render → stitch
pub struct DocumentComposer<'a> {
    options: TransformOptions<'a>,
    parser: CsfParser,
    renderer: &'a dyn Renderer,
    identity: &'a dyn IdentityResolver,
}

impl std::fmt::Debug for DocumentComposer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentComposer")
            .field("options", &self.options)
            .field("parser", &self.parser)
            .finish_non_exhaustive()
    }
}

static DEFAULT_RENDERER: JsRenderer = JsRenderer::DEFAULT;

impl<'a> DocumentComposer<'a> {
    /// Create composer with the default parser, renderer and identity
    #[inline]
    #[must_use]
    pub fn new(options: TransformOptions<'a>) -> Self {
        Self {
            options,
            parser: CsfParser::new(),
            renderer: &DEFAULT_RENDERER,
            identity: &CsfIdentity,
        }
    }

    /// With parser (e.g. for a specific dialect)
    #[inline]
    #[must_use]
    pub fn with_parser(mut self, parser: CsfParser) -> Self {
        self.parser = parser;
        self
    }

    /// With renderer
    #[inline]
    #[must_use]
    pub fn with_renderer(mut self, renderer: &'a dyn Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// With identity resolver
    #[inline]
    #[must_use]
    pub fn with_identity(mut self, identity: &'a dyn IdentityResolver) -> Self {
        self.identity = identity;
        self
    }

    /// Parse `source` and compose the output document
    ///
    /// # Errors
    /// Parse, identity and strategy failures; no partial output is produced.
    pub fn transform(&self, source: &str) -> TransformResult<String> {
        let titles: &dyn TitleResolver = self.options.title_override.unwrap_or(&IdentityTitle);
        let module = self.parser.parse(source, titles)?;
        self.compose(source, &module)
    }

    /// Compose the output document from an already parsed module
    ///
    /// The module title is used as-is; title overrides only apply in
    /// [`DocumentComposer::transform`].
    ///
    /// # Errors
    /// Identity and strategy failures.
    pub fn compose(&self, source: &str, module: &StoryModule) -> TransformResult<String> {
        let tree = ScaffoldAssembler::new(self.options.tag_policy, self.options.test_body)
            .with_module_setup(self.options.module_setup)
            .with_identity(self.identity)
            .assemble(module)?;

        let mut output = if self.options.clear_body {
            String::new()
        } else {
            source.to_string()
        };

        match tree {
            Some(tree) => {
                if !output.is_empty() {
                    if !output.ends_with('\n') {
                        output.push('\n');
                    }
                    output.push('\n');
                }
                output.push_str(&self.renderer.render_guarded(&tree));
                Ok(output)
            }
            None if self.options.insert_test_if_empty => {
                // The module is still loaded as a test file, so it must register
                // a skipped group rather than silently contain no tests
                let title = module.title().unwrap_or_default();
                tracing::info!(title, "no qualifying stories, emitting placeholder");
                Ok(self.renderer.render(&placeholder(title)))
            }
            None => Ok(output),
        }
    }
}

/// Skipped group holding one always-passing case
#[must_use]
pub fn placeholder(title: &str) -> TestGroup {
    TestGroup::new(title)
        .skipped()
        .with_child(TestCase::new(PLACEHOLDER_CASE, false, Body::new()))
}

/// Transform a story module with the default parser and renderer
///
/// # Errors
/// Parse, identity and strategy failures; no partial output is produced.
pub fn transform_csf(source: &str, options: &TransformOptions<'_>) -> TransformResult<String> {
    DocumentComposer::new(*options).transform(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;
    use crate::error::StrategyError;
    use pretty_assertions::assert_eq;

    fn visit(ctx: &TestContext) -> Result<Body, StrategyError> {
        Ok(Body::statement(format!("await visit({:?});", ctx.id())))
    }

    const SOURCE: &str = "export default { title: 'foo/bar' };\nexport const A = {};\n";

    #[test]
    fn appends_guarded_block() {
        let output = transform_csf(SOURCE, &TransformOptions::new(&visit)).unwrap();
        let expected = r#"export default { title: 'foo/bar' };
export const A = {};

if (!require.main) {
  describe("foo/bar", () => {
    describe("A", () => {
      it("smoke-test", async () => {
        await visit("foo-bar--a");
      });
    });
  });
}
"#;
        assert_eq!(output, expected);
    }

    #[test]
    fn clear_body_drops_source() {
        let options = TransformOptions::new(&visit).with_clear_body(true);
        let output = transform_csf(SOURCE, &options).unwrap();
        assert!(output.starts_with("if (!require.main) {"));
        assert!(!output.contains("export default"));
    }

    #[test]
    fn no_tree_returns_source_untouched() {
        let policy = TagPolicy::new().with_include(["play"]);
        let options = TransformOptions::new(&visit).with_tag_policy(&policy);
        assert_eq!(transform_csf(SOURCE, &options).unwrap(), SOURCE);

        let cleared = options.with_clear_body(true);
        assert_eq!(transform_csf(SOURCE, &cleared).unwrap(), "");
    }

    #[test]
    fn placeholder_when_requested() {
        let policy = TagPolicy::new().with_include(["play"]);
        let options = TransformOptions::new(&visit)
            .with_tag_policy(&policy)
            .with_insert_test_if_empty(true);
        assert_eq!(
            transform_csf(SOURCE, &options).unwrap(),
            "describe.skip(\"foo/bar\", () => {\n  it(\"no-op\", () => {});\n});\n"
        );
    }

    #[test]
    fn title_override_applies_before_ids() {
        let prefix = |title: Option<&str>| title.map(|t| format!("Example/{t}"));
        let options = TransformOptions::new(&visit).with_title_override(&prefix);
        let output = transform_csf(SOURCE, &options).unwrap();
        assert!(output.contains("describe(\"Example/foo/bar\", () => {"));
        assert!(output.contains("await visit(\"example-foo-bar--a\");"));
    }
}
