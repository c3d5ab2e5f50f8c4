pub mod classifier;
pub mod collector;
pub mod content;
pub mod dedup;
pub mod element;
pub mod eligibility;
pub mod label;
pub mod layout;
pub mod processor;
pub mod profile;
pub mod selector;
pub mod state;
pub mod text;

pub use classifier::Classification;
pub use collector::{Candidate, NodeCollector};
pub use content::extract_main_text;
pub use element::{ElementDescriptor, ExtendedFields};
pub use layout::{CapturedLayout, LayoutSample, StaticLayout};
pub use processor::DomProcessor;
pub use profile::{ExtractionProfile, EXTENDED, MINIMAL};
pub use state::Snapshot;
