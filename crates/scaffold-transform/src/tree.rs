//! Generated test tree
//!
//! Built bottom-up by the assembler and handed whole to a renderer:
//!
//! ```text
//! Group("Example/foo/bar")
//! ├── Setup(body)              optional, always first
//! ├── Group("A")
//! │   └── Case("smoke-test")
//! └── Group("B")
//!     └── Case("play-test", skipped)
//! ```

use crate::strategy::Body;

/// Kind of generated case, decided by the story's own play function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseKind {
    /// Story renders without errors
    Smoke,
    /// Story's play function runs to completion
    Play,
}

impl CaseKind {
    /// Pick the kind for a story
    #[inline]
    #[must_use]
    pub fn for_story(has_own_play_function: bool) -> Self {
        if has_own_play_function {
            CaseKind::Play
        } else {
            CaseKind::Smoke
        }
    }

    /// Case label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            CaseKind::Smoke => "smoke-test",
            CaseKind::Play => "play-test",
        }
    }
}

/// One test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    label: String,
    skipped: bool,
    body: Body,
}

impl TestCase {
    /// Create case
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<String>, skipped: bool, body: Body) -> Self {
        Self {
            label: label.into(),
            skipped,
            body,
        }
    }

    /// Case label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the case is emitted as skipped
    #[inline]
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    /// Case body
    #[inline]
    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }
}

/// A labelled group of nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestGroup {
    label: String,
    skipped: bool,
    children: Vec<TestNode>,
}

impl TestGroup {
    /// Create empty group
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            skipped: false,
            children: Vec::new(),
        }
    }

    /// Mark the whole group as skipped
    #[inline]
    #[must_use]
    pub fn skipped(mut self) -> Self {
        self.skipped = true;
        self
    }

    /// Append a child
    #[inline]
    #[must_use]
    pub fn with_child(mut self, child: impl Into<TestNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append children in order
    #[must_use]
    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TestNode>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Group label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the group is emitted as skipped
    #[inline]
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    /// Children in emission order
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[TestNode] {
        &self.children
    }

    /// Child groups, skipping setup and case nodes
    pub fn groups(&self) -> impl Iterator<Item = &TestGroup> {
        self.children.iter().filter_map(|node| match node {
            TestNode::Group(group) => Some(group),
            _ => None,
        })
    }

    /// Child cases, skipping setup and group nodes
    pub fn cases(&self) -> impl Iterator<Item = &TestCase> {
        self.children.iter().filter_map(|node| match node {
            TestNode::Case(case) => Some(case),
            _ => None,
        })
    }

    /// Setup body, if the first child is one
    #[must_use]
    pub fn setup(&self) -> Option<&Body> {
        match self.children.first() {
            Some(TestNode::Setup(body)) => Some(body),
            _ => None,
        }
    }
}

/// Node of the generated tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestNode {
    /// Nested group
    Group(TestGroup),
    /// Test case
    Case(TestCase),
    /// Per-test setup hook for the enclosing group
    Setup(Body),
}

impl From<TestGroup> for TestNode {
    fn from(group: TestGroup) -> Self {
        TestNode::Group(group)
    }
}

impl From<TestCase> for TestNode {
    fn from(case: TestCase) -> Self {
        TestNode::Case(case)
    }
}
