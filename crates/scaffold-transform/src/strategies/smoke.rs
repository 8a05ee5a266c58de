//! Smoke body strategy

use crate::context::TestContext;
use crate::error::StrategyError;
use crate::render::js_string;
use crate::strategy::{Body, TestBodyStrategy};

const DEFAULT_CALLEE: &str = "__test";

/// Emits a single call to a runner function with the story id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeBodyStrategy {
    callee: String,
}

impl Default for SmokeBodyStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl SmokeBodyStrategy {
    /// Create strategy calling `__test(id)`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            callee: DEFAULT_CALLEE.to_string(),
        }
    }

    /// With the global function to call
    #[inline]
    #[must_use]
    pub fn with_callee(mut self, callee: impl Into<String>) -> Self {
        self.callee = callee.into();
        self
    }

    /// Function called by the body
    #[inline]
    #[must_use]
    pub fn callee(&self) -> &str {
        &self.callee
    }
}

impl TestBodyStrategy for SmokeBodyStrategy {
    fn build_body(&self, context: &TestContext) -> Result<Body, StrategyError> {
        if self.callee.trim().is_empty() {
            return Err(StrategyError::new("smoke strategy has no callee"));
        }
        Ok(Body::statement(format!(
            "await {}({});",
            self.callee,
            js_string(context.id())
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::CsfIdentity;
    use scaffold_csf::StoryRecord;

    fn context() -> TestContext {
        TestContext::build(&StoryRecord::new("Primary"), "Example/Button", &CsfIdentity).unwrap()
    }

    #[test]
    fn references_story_id() {
        let body = SmokeBodyStrategy::new().build_body(&context()).unwrap();
        assert_eq!(body, Body::from("await __test(\"example-button--primary\");"));
    }

    #[test]
    fn custom_callee() {
        let body = SmokeBodyStrategy::new()
            .with_callee("globalThis.visit")
            .build_body(&context())
            .unwrap();
        assert_eq!(body.statements()[0], "await globalThis.visit(\"example-button--primary\");");
    }

    #[test]
    fn blank_callee_fails() {
        let err = SmokeBodyStrategy::new()
            .with_callee(" ")
            .build_body(&context())
            .unwrap_err();
        assert_eq!(err.message(), "smoke strategy has no callee");
    }
}
