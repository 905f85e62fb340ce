use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use super::FormError;

/// A DOM element address, rendered as a CSS selector for the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Id(String),
    Name(String),
    Class(String),
}

impl Selector {
    pub fn id(id: &str) -> Self {
        Selector::Id(id.to_string())
    }

    pub fn name(name: &str) -> Self {
        Selector::Name(name.to_string())
    }

    pub fn class(class: &str) -> Self {
        Selector::Class(class.to_string())
    }

    pub fn css(&self) -> String {
        match self {
            Selector::Id(id) => format!("#{id}"),
            Selector::Name(name) => format!("[name=\"{}\"]", name.replace('"', "\\\"")),
            Selector::Class(class) => format!(".{class}"),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

/// The browser operations the form filler needs.
///
/// Every `wait_*` call polls until its condition holds or `timeout` elapses,
/// returning `FormError::Timeout` in the latter case.
#[async_trait]
pub trait BrowserSession: Send {
    async fn goto(&mut self, url: &str) -> Result<(), FormError>;

    async fn wait_present(&mut self, selector: &Selector, timeout: Duration)
        -> Result<(), FormError>;

    /// Present, displayed and enabled.
    async fn wait_clickable(
        &mut self,
        selector: &Selector,
        timeout: Duration,
    ) -> Result<(), FormError>;

    /// Absent or hidden.
    async fn wait_gone(&mut self, selector: &Selector, timeout: Duration) -> Result<(), FormError>;

    /// Clears the element and types `value` into it.
    async fn fill(&mut self, selector: &Selector, value: &str) -> Result<(), FormError>;

    async fn click(&mut self, selector: &Selector) -> Result<(), FormError>;

    async fn close(&mut self) -> Result<(), FormError>;
}
