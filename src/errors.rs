use crate::wizard::WizardStep;
use serde::Serialize;
use thiserror::Error;

/// A user-correctable problem that keeps the wizard on its current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("missing full name")]
    MissingFullName,
    #[error("missing country")]
    MissingCountry,
    #[error("no destinations selected")]
    NoDestinations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    Category,
    SkippableCategory,
    Place,
    Region,
    SubPlace,
}

impl std::fmt::Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LookupKind::Category => "category",
            LookupKind::SkippableCategory => "skippable category",
            LookupKind::Place => "place",
            LookupKind::Region => "region",
            LookupKind::SubPlace => "sub-place",
        };
        write!(f, "{}", name)
    }
}

/// An intent referenced something the catalog does not know about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("unknown {kind} `{name}`")]
pub struct LookupMiss {
    pub kind: LookupKind,
    pub name: String,
}

impl LookupMiss {
    pub fn new(kind: LookupKind, name: impl Into<String>) -> Self {
        Self { kind, name: name.into() }
    }
}

/// Everything a wizard operation can report back. None of these end a session:
/// the selection state is left exactly as it was before the failing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "error", content = "detail", rename_all = "snake_case")]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    LookupMiss(#[from] LookupMiss),
    #[error("region `{0}` is not selected")]
    RegionNotSelected(String),
    #[error("not available on the {0:?} step")]
    OutOfStep(WizardStep),
    #[error("submission failed: {0}")]
    Submission(String),
}

impl WizardError {
    pub fn is_validation(&self) -> bool {
        matches!(self, WizardError::Validation(_))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Failures while loading or checking a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid catalog: {0}")]
    Invalid(String),
}
