//! Selection state machine and recommendation engine for a multi-step trip
//! planning wizard. Rendering and delivery are left to the embedding shell.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod logger;
pub mod recommend;
pub mod selection;
pub mod submission;
pub mod sync;
pub mod wizard;

pub use catalog::{default_catalog, Catalog};
pub use errors::{CatalogError, LookupKind, LookupMiss, ValidationError, WizardError};
pub use recommend::{derive, DerivedRecommendations};
pub use selection::{BasicInfo, SelectionState, SelectionStore};
pub use submission::{LogSubmitter, Submission, Submitter};
pub use sync::{Patch, ViewState};
pub use wizard::{Intent, Update, WizardSession, WizardStep};
