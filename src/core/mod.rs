pub mod browser;
pub mod config;
pub mod dom;

pub use browser::BrowserTrait;
pub use config::{BrowserConfig, Config, ExtractConfig, ProfileKind};
pub use dom::LayoutProbe;
