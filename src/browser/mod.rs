pub mod capture;
pub mod chrome;

pub use capture::{capture_page, CapturedPage, PAGE_CAPTURE_SCRIPT};
pub use chrome::ChromeBrowser;
