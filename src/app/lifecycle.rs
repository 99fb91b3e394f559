use crate::error::Result;
use crate::models::{Browser, SpecResult};

/// Entry points the host runner calls, in lifecycle order.
pub trait Lifecycle {
    fn on_run_start(&mut self, browsers: &[Browser]) -> Result<()>;

    fn on_browser_start(&mut self, browser: &Browser) -> Result<()>;

    /// A console message (`console.log` and friends) captured from a browser.
    fn on_browser_log(&mut self, browser: &Browser, message: &str) -> Result<()>;

    fn on_spec_complete(&mut self, browser: &Browser, result: &SpecResult) -> Result<()>;

    /// A compile or runtime error not attributable to any spec.
    fn on_browser_error(&mut self, browser: &Browser, error: &str) -> Result<()>;

    fn on_run_complete(&mut self) -> Result<()>;
}
