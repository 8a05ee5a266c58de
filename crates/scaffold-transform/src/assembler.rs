//! Scaffold assembly
//!
//! Builds the module group for one story module: one story group per
//! qualifying story, in declaration order, each holding a single case whose
//! body comes from the caller's [`TestBodyStrategy`].

use scaffold_csf::{StoryModule, StoryRecord};

use crate::context::TestContext;
use crate::error::{TransformError, TransformResult};
use crate::identity::{CsfIdentity, IdentityResolver};
use crate::policy::{Classification, TagPolicy};
use crate::strategy::{ModuleSetupStrategy, TestBodyStrategy};
use crate::tree::{CaseKind, TestCase, TestGroup, TestNode};

/// Builds the generated test tree for a module
pub struct ScaffoldAssembler<'a> {
    policy: &'a TagPolicy,
    test_body: &'a dyn TestBodyStrategy,
    module_setup: Option<&'a dyn ModuleSetupStrategy>,
    identity: &'a dyn IdentityResolver,
}

impl std::fmt::Debug for ScaffoldAssembler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScaffoldAssembler")
            .field("policy", self.policy)
            .field("has_module_setup", &self.module_setup.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a> ScaffoldAssembler<'a> {
    /// Create assembler with Storybook-compatible identity
    #[inline]
    #[must_use]
    pub fn new(policy: &'a TagPolicy, test_body: &'a dyn TestBodyStrategy) -> Self {
        Self {
            policy,
            test_body,
            module_setup: None,
            identity: &CsfIdentity,
        }
    }

    /// With module setup strategy
    #[inline]
    #[must_use]
    pub fn with_module_setup(mut self, setup: Option<&'a dyn ModuleSetupStrategy>) -> Self {
        self.module_setup = setup;
        self
    }

    /// With custom identity resolver
    #[inline]
    #[must_use]
    pub fn with_identity(mut self, identity: &'a dyn IdentityResolver) -> Self {
        self.identity = identity;
        self
    }

    /// Assemble the module group
    ///
    /// Returns `Ok(None)` ("no tree") when the module has no title or no
    /// story qualifies. A module group is never returned without children.
    ///
    /// # Errors
    /// Identity and strategy failures abort the whole assembly.
    pub fn assemble(&self, module: &StoryModule) -> TransformResult<Option<TestGroup>> {
        let Some(title) = module.title().filter(|t| !t.is_empty()) else {
            tracing::debug!("module has no title, no tests generated");
            return Ok(None);
        };

        let mut story_groups = Vec::new();
        for story in module.stories() {
            match self.policy.classify(story.effective_tags(module)) {
                Classification::Excluded => {
                    tracing::debug!(story = story.export_key(), "story excluded by tag policy");
                }
                Classification::Included { skip } => {
                    tracing::debug!(story = story.export_key(), skip, "story included");
                    story_groups.push(self.story_group(story, title, skip)?);
                }
            }
        }

        if story_groups.is_empty() {
            tracing::debug!(title, "no qualifying stories");
            return Ok(None);
        }

        let mut module_group = TestGroup::new(title);
        if let Some(setup) = self.module_setup {
            let body = setup.build_setup().map_err(TransformError::Setup)?;
            module_group = module_group.with_child(TestNode::Setup(body));
        }
        Ok(Some(module_group.with_children(story_groups)))
    }

    fn story_group(
        &self,
        story: &StoryRecord,
        title: &str,
        skip: bool,
    ) -> TransformResult<TestGroup> {
        let context = TestContext::build(story, title, self.identity)?;
        let body = self
            .test_body
            .build_body(&context)
            .map_err(|e| TransformError::strategy(story.export_key(), e))?;
        let kind = CaseKind::for_story(story.has_own_play_function());

        let case = TestCase::new(kind.label(), skip, body);
        Ok(TestGroup::new(context.display_name()).with_child(case))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StrategyError;
    use crate::strategy::Body;
    use pretty_assertions::assert_eq;

    fn id_body(ctx: &TestContext) -> Result<Body, StrategyError> {
        Ok(Body::statement(format!("visit({:?});", ctx.id())))
    }

    fn module() -> StoryModule {
        StoryModule::new(Some("foo/bar".into()))
            .with_story(StoryRecord::new("A"))
            .with_story(StoryRecord::new("B"))
    }

    fn labels(group: &TestGroup) -> Vec<&str> {
        group.groups().map(TestGroup::label).collect()
    }

    #[test]
    fn groups_every_story_under_the_title() {
        let policy = TagPolicy::new();
        let tree = ScaffoldAssembler::new(&policy, &id_body)
            .assemble(&module())
            .unwrap()
            .unwrap();

        assert_eq!(tree.label(), "foo/bar");
        assert_eq!(labels(&tree), vec!["A", "B"]);
        let case = tree.groups().next().unwrap().cases().next().unwrap();
        assert_eq!(case.label(), "smoke-test");
        assert!(!case.is_skipped());
        assert_eq!(case.body(), &Body::from("visit(\"foo-bar--a\");"));
    }

    #[test]
    fn setup_precedes_story_groups() {
        let policy = TagPolicy::new();
        let setup = || -> Result<Body, StrategyError> { Ok(Body::from("reset();")) };
        let tree = ScaffoldAssembler::new(&policy, &id_body)
            .with_module_setup(Some(&setup))
            .assemble(&module())
            .unwrap()
            .unwrap();

        assert!(matches!(tree.children()[0], TestNode::Setup(_)));
        assert_eq!(tree.children().len(), 3);
    }

    #[test]
    fn untitled_module_has_no_tree() {
        let policy = TagPolicy::new();
        let untitled = module().with_title(None);
        assert_eq!(
            ScaffoldAssembler::new(&policy, &id_body).assemble(&untitled).unwrap(),
            None
        );
    }

    #[test]
    fn all_excluded_has_no_tree_and_skips_setup() {
        let policy = TagPolicy::new().with_include(["never"]);
        let setup = || -> Result<Body, StrategyError> { Err(StrategyError::new("must not run")) };
        let result = ScaffoldAssembler::new(&policy, &id_body)
            .with_module_setup(Some(&setup))
            .assemble(&module())
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn failing_strategy_aborts() {
        let policy = TagPolicy::new();
        let failing = |ctx: &TestContext| -> Result<Body, StrategyError> {
            if ctx.export_key() == "B" {
                Err(StrategyError::new("boom"))
            } else {
                Ok(Body::new())
            }
        };
        let err = ScaffoldAssembler::new(&policy, &failing)
            .assemble(&module())
            .unwrap_err();
        assert!(matches!(err, TransformError::Strategy { export_key, .. } if export_key == "B"));
    }
}
