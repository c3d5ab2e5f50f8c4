pub mod browser;
pub mod core;
pub mod dom;
pub mod errors;
pub mod testing;
pub mod types;

pub use browser::ChromeBrowser;
pub use core::{BrowserTrait, Config, ExtractConfig, LayoutProbe, ProfileKind};
pub use dom::{DomProcessor, ElementDescriptor, Snapshot};
pub use errors::ExtractError;
pub use types::*;
