//! Built-in body strategies
//!
//! - [`PlaywrightBodyStrategy`]: drives a story through a Playwright page
//! - [`SmokeBodyStrategy`]: minimal body that only references the story id
//! - [`PageSetupStrategy`]: resets the page before each test of a module

mod playwright;
mod smoke;

pub use playwright::{PageSetupStrategy, PlaywrightBodyStrategy};
pub use smoke::SmokeBodyStrategy;
