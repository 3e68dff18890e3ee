use crate::recommend::DerivedRecommendations;
use crate::selection::{BasicInfo, SelectionState};
use crate::submission::Submission;
use crate::sync::Patch;
use crate::wizard::WizardStep;
use serde::{Deserialize, Serialize};

/// A user action reported by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Current contents of the basic info form; kept as a draft until the step is left.
    EditBasicInfo(BasicInfo),
    ToggleDestination { category: String, place: String },
    SetCategorySkip { category: String, skip: bool },
    ToggleRegionSubSelection { region: String, place: String },
    SetRegionSkip { region: String, skip: bool },
    ToggleExperience { name: String },
    Next,
    Back,
}

impl Intent {
    /// Step whose controls produce this intent. Navigation works on every step.
    pub fn step(&self) -> Option<WizardStep> {
        match self {
            Intent::EditBasicInfo(_) => Some(WizardStep::BasicInfo),
            Intent::ToggleDestination { .. }
            | Intent::SetCategorySkip { .. }
            | Intent::ToggleRegionSubSelection { .. }
            | Intent::SetRegionSkip { .. } => Some(WizardStep::Destinations),
            Intent::ToggleExperience { .. } => Some(WizardStep::Experiences),
            Intent::Next | Intent::Back => None,
        }
    }
}

/// What the renderer has to do after an intent was handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "update", rename_all = "snake_case")]
pub enum Update {
    /// Draw the whole step again.
    StepChanged {
        step: WizardStep,
        state: SelectionState,
        recommendations: DerivedRecommendations,
    },
    /// Patch the current step in place.
    Patched { patches: Vec<Patch> },
    Submitted { submission: Submission },
    Unchanged,
}
