//! Playwright page-visit strategies
//!
//! The generated body expects the test-runner globals: `page`,
//! `jestPlaywright`, `__test` (exposed on the page) and the optional
//! `globalThis.__sbPreVisit` / `__sbPostVisit` / `__sbCollectCoverage` hooks.

use crate::context::TestContext;
use crate::error::StrategyError;
use crate::render::js_string;
use crate::strategy::{Body, ModuleSetupStrategy, TestBodyStrategy};

/// Substring of the Playwright error raised when a story navigates away
const NAVIGATION_ERROR: &str = "Execution context was destroyed";

const COVERAGE_ERROR: &str = "[Test runner] An error occurred when evaluating code coverage:\n\
    The code in this story is not instrumented, which means the coverage setup is likely not correct.\n\
    More info: https://github.com/storybookjs/test-runner#setting-up-code-coverage";

const SETUP_PAGE: &str = "await globalThis.__sbSetupPage(globalThis.page, globalThis.context);";

/// Visits each story in a Playwright page and runs it through `__test`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaywrightBodyStrategy {
    coverage: bool,
    retry_on_navigation: bool,
}

impl Default for PlaywrightBodyStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaywrightBodyStrategy {
    /// Create strategy with coverage collection and navigation retry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            coverage: true,
            retry_on_navigation: true,
        }
    }

    /// With coverage collection (still gated on `__sbCollectCoverage` at runtime)
    #[inline]
    #[must_use]
    pub fn with_coverage(mut self, coverage: bool) -> Self {
        self.coverage = coverage;
        self
    }

    /// With a single retry when the story navigates mid-test
    #[inline]
    #[must_use]
    pub fn with_retry_on_navigation(mut self, retry: bool) -> Self {
        self.retry_on_navigation = retry;
        self
    }

    fn test_fn(&self, context: &TestContext) -> String {
        let id = js_string(context.id());
        let title = js_string(context.title());
        let name = js_string(context.display_name());

        let mut out = format!(
            "const testFn = async () => {{
  const context = {{
    id: {id},
    title: {title},
    name: {name}
  }};
  const onPageError = err => {{
    globalThis.__sbThrowUncaughtPageError(err, context);
  }};
  page.on('pageerror', onPageError);
  if (globalThis.__sbPreVisit) {{
    await globalThis.__sbPreVisit(page, context);
  }}
  const result = await page.evaluate(({{ id, hasPlayFn }}) => __test(id, hasPlayFn), {{
    id: {id}
  }});
  if (globalThis.__sbPostVisit) {{
    await globalThis.__sbPostVisit(page, context);
  }}
"
        );
        if self.coverage {
            out.push_str(&format!(
                "  if (globalThis.__sbCollectCoverage) {{
    const isCoverageSetupCorrectly = await page.evaluate(() => '__coverage__' in window);
    if (!isCoverageSetupCorrectly) {{
      throw new Error({});
    }}
    await jestPlaywright.saveCoverage(page);
  }}
",
                js_string(COVERAGE_ERROR)
            ));
        }
        out.push_str(
            "  page.off('pageerror', onPageError);
  return result;
};",
        );
        out
    }

    fn retry(context: &TestContext) -> String {
        let message = js_string(&format!(
            "An error occurred in the following story, most likely because of a navigation: \"{}/{}\". Retrying...",
            context.title(),
            context.display_name()
        ));
        format!(
            "try {{
  await testFn();
}} catch (err) {{
  if (err.toString().includes({marker})) {{
    console.log({message});
    await jestPlaywright.resetPage();
    {SETUP_PAGE}
    await testFn();
  }} else {{
    throw err;
  }}
}}",
            marker = js_string(NAVIGATION_ERROR),
        )
    }
}

impl TestBodyStrategy for PlaywrightBodyStrategy {
    fn build_body(&self, context: &TestContext) -> Result<Body, StrategyError> {
        let invoke = if self.retry_on_navigation {
            Self::retry(context)
        } else {
            "await testFn();".to_string()
        };
        Ok(Body::statement(self.test_fn(context)).with_statement(invoke))
    }
}

/// Resets the page before each test via `__sbSetupPage`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageSetupStrategy;

impl ModuleSetupStrategy for PageSetupStrategy {
    fn build_setup(&self) -> Result<Body, StrategyError> {
        Ok(Body::from(SETUP_PAGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::CsfIdentity;
    use pretty_assertions::assert_eq;
    use scaffold_csf::StoryRecord;

    fn context() -> TestContext {
        TestContext::build(&StoryRecord::new("A"), "Example/foo/bar", &CsfIdentity).unwrap()
    }

    #[test]
    fn body_without_coverage_or_retry() {
        let body = PlaywrightBodyStrategy::new()
            .with_coverage(false)
            .with_retry_on_navigation(false)
            .build_body(&context())
            .unwrap();
        let expected = r#"const testFn = async () => {
  const context = {
    id: "example-foo-bar--a",
    title: "Example/foo/bar",
    name: "A"
  };
  const onPageError = err => {
    globalThis.__sbThrowUncaughtPageError(err, context);
  };
  page.on('pageerror', onPageError);
  if (globalThis.__sbPreVisit) {
    await globalThis.__sbPreVisit(page, context);
  }
  const result = await page.evaluate(({ id, hasPlayFn }) => __test(id, hasPlayFn), {
    id: "example-foo-bar--a"
  });
  if (globalThis.__sbPostVisit) {
    await globalThis.__sbPostVisit(page, context);
  }
  page.off('pageerror', onPageError);
  return result;
};"#;
        assert_eq!(body.statements(), &[expected.to_string(), "await testFn();".to_string()]);
    }

    #[test]
    fn coverage_block_is_single_line_error() {
        let body = PlaywrightBodyStrategy::new().build_body(&context()).unwrap();
        let test_fn = &body.statements()[0];
        assert!(test_fn.contains("if (globalThis.__sbCollectCoverage) {"));
        assert!(test_fn.contains("await jestPlaywright.saveCoverage(page);"));
        let throw = test_fn
            .lines()
            .find(|line| line.contains("throw new Error("))
            .unwrap();
        assert!(throw.contains("evaluating code coverage:\\nThe code in this story"));
    }

    #[test]
    fn retry_wrapper() {
        let body = PlaywrightBodyStrategy::new().build_body(&context()).unwrap();
        let expected = r#"try {
  await testFn();
} catch (err) {
  if (err.toString().includes("Execution context was destroyed")) {
    console.log("An error occurred in the following story, most likely because of a navigation: \"Example/foo/bar/A\". Retrying...");
    await jestPlaywright.resetPage();
    await globalThis.__sbSetupPage(globalThis.page, globalThis.context);
    await testFn();
  } else {
    throw err;
  }
}"#;
        assert_eq!(body.statements()[1], expected);
    }

    #[test]
    fn page_setup() {
        assert_eq!(
            PageSetupStrategy.build_setup().unwrap(),
            Body::from("await globalThis.__sbSetupPage(globalThis.page, globalThis.context);")
        );
    }
}
