//! Testing utilities for the storyscaffold workspace
//!
//! Shared fixtures, recording strategies and canned story sources.

#![allow(missing_docs)]

use std::cell::RefCell;

use scaffold_csf::{StoryModule, StoryRecord};
use scaffold_transform::{Body, ModuleSetupStrategy, StrategyError, TestBodyStrategy, TestContext};

/// Two untagged stories under `foo/bar`
pub const BASIC_STORIES: &str = "export default { title: 'foo/bar', component: Button };
export const A = { };
export const B = { };
";

/// Story modules with no title
pub const UNTITLED_STORIES: &str = "export default { component: Button };
export const A = { };
";

/// CSF2-style stories with assigned play functions and tags
pub const CSF2_STORIES: &str = "export default { title: 'Example/Header', tags: ['autodocs'] };
export const LoggedIn = () => <Header user={{}} />;
LoggedIn.play = async () => {};
export const LoggedOut = () => <Header />;
LoggedOut.tags = ['skip-test'];
";

/// TypeScript meta bound to a variable with `satisfies`
pub const SATISFIES_STORIES: &str = "import type { Meta, StoryObj } from '@storybook/react';
const meta = {
  title: 'Example/Button',
  tags: ['autodocs'],
} satisfies Meta<typeof Button>;
export default meta;
type Story = StoryObj<typeof meta>;
export const Primary: Story = { args: { primary: true } };
export const Secondary: Story = { tags: ['flaky'], play: async () => {} };
";

pub fn record(export_key: &str) -> StoryRecord {
    StoryRecord::new(export_key)
}

pub fn tagged(export_key: &str, tags: &[&str]) -> StoryRecord {
    StoryRecord::new(export_key).with_tags(tags.iter().copied())
}

pub fn with_play(export_key: &str) -> StoryRecord {
    StoryRecord::new(export_key).with_play_function(true)
}

pub fn module(title: &str, stories: Vec<StoryRecord>) -> StoryModule {
    stories
        .into_iter()
        .fold(StoryModule::new(Some(title.to_string())), StoryModule::with_story)
}

pub fn untitled_module(stories: Vec<StoryRecord>) -> StoryModule {
    stories.into_iter().fold(StoryModule::new(None), StoryModule::with_story)
}

/// Body strategy that records every context it is handed
#[derive(Debug, Default)]
pub struct RecordingStrategy {
    seen: RefCell<Vec<TestContext>>,
}

impl RecordingStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> Vec<TestContext> {
        self.seen.borrow().clone()
    }

    pub fn seen_ids(&self) -> Vec<String> {
        self.seen.borrow().iter().map(|ctx| ctx.id().to_string()).collect()
    }
}

impl TestBodyStrategy for RecordingStrategy {
    fn build_body(&self, context: &TestContext) -> Result<Body, StrategyError> {
        self.seen.borrow_mut().push(context.clone());
        Ok(Body::statement(format!("visit({:?});", context.id())))
    }
}

/// Body strategy that fails for one export key
#[derive(Debug)]
pub struct FailingStrategy {
    pub fail_on: String,
}

impl FailingStrategy {
    pub fn on(export_key: &str) -> Self {
        Self {
            fail_on: export_key.to_string(),
        }
    }
}

impl TestBodyStrategy for FailingStrategy {
    fn build_body(&self, context: &TestContext) -> Result<Body, StrategyError> {
        if context.export_key() == self.fail_on {
            return Err(StrategyError::new(format!("refusing {}", context.export_key())));
        }
        Ok(Body::from("ok();"))
    }
}

/// Setup strategy that counts invocations
#[derive(Debug, Default)]
pub struct CountingSetup {
    calls: RefCell<usize>,
}

impl CountingSetup {
    pub fn calls(&self) -> usize {
        *self.calls.borrow()
    }
}

impl ModuleSetupStrategy for CountingSetup {
    fn build_setup(&self) -> Result<Body, StrategyError> {
        *self.calls.borrow_mut() += 1;
        Ok(Body::from("reset();"))
    }
}
