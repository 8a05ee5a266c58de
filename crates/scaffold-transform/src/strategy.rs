//! Pluggable body generation
//!
//! A [`TestBodyStrategy`] turns a [`TestContext`] into the statements of one
//! test case; a [`ModuleSetupStrategy`] produces the statements run before
//! each test of a module. Both are passed explicitly into the assembler.
//! Plain closures implement both traits.

use crate::context::TestContext;
use crate::error::StrategyError;

/// Opaque statements making up a test or setup body
///
/// Each statement is emitted verbatim, re-indented line by line to its
/// nesting depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    statements: Vec<String>,
}

impl Body {
    /// Create empty body
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create body holding a single statement
    #[inline]
    #[must_use]
    pub fn statement(statement: impl Into<String>) -> Self {
        Self {
            statements: vec![statement.into()],
        }
    }

    /// Append a statement
    #[inline]
    #[must_use]
    pub fn with_statement(mut self, statement: impl Into<String>) -> Self {
        self.statements.push(statement.into());
        self
    }

    /// Statements in emission order
    #[inline]
    #[must_use]
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// Check if there is nothing to emit
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl From<&str> for Body {
    fn from(statement: &str) -> Self {
        Self::statement(statement)
    }
}

impl From<String> for Body {
    fn from(statement: String) -> Self {
        Self::statement(statement)
    }
}

impl<S: Into<String>> FromIterator<S> for Body {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            statements: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Builds the body of one story's test case
pub trait TestBodyStrategy {
    /// Build the case body for a story
    ///
    /// # Errors
    /// Any error aborts the whole transform
    fn build_body(&self, context: &TestContext) -> Result<Body, StrategyError>;
}

impl<F> TestBodyStrategy for F
where
    F: Fn(&TestContext) -> Result<Body, StrategyError>,
{
    fn build_body(&self, context: &TestContext) -> Result<Body, StrategyError> {
        self(context)
    }
}

/// Builds the module-level setup body
pub trait ModuleSetupStrategy {
    /// Build the setup body
    ///
    /// # Errors
    /// Any error aborts the whole transform
    fn build_setup(&self) -> Result<Body, StrategyError>;
}

impl<F> ModuleSetupStrategy for F
where
    F: Fn() -> Result<Body, StrategyError>,
{
    fn build_setup(&self) -> Result<Body, StrategyError> {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::CsfIdentity;
    use scaffold_csf::StoryRecord;

    #[test]
    fn body_builders() {
        let body = Body::statement("const a = 1;").with_statement("await run(a);");
        assert_eq!(body.statements().len(), 2);
        assert!(!body.is_empty());
        assert!(Body::new().is_empty());

        let collected: Body = ["a();", "b();"].into_iter().collect();
        assert_eq!(collected.statements(), &["a();".to_string(), "b();".to_string()]);
    }

    #[test]
    fn closures_are_strategies() {
        let body_fn = |ctx: &TestContext| -> Result<Body, StrategyError> {
            Ok(Body::statement(format!("visit({:?});", ctx.id())))
        };
        let setup_fn = || -> Result<Body, StrategyError> { Ok(Body::from("reset();")) };

        let ctx = TestContext::build(&StoryRecord::new("A"), "foo", &CsfIdentity).unwrap();
        let body = body_fn.build_body(&ctx).unwrap();
        assert_eq!(body.statements()[0], "visit(\"foo--a\");");
        assert_eq!(setup_fn.build_setup().unwrap().statements()[0], "reset();");
    }
}
