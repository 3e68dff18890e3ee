pub mod intent;

use crate::catalog::Catalog;
use crate::errors::{ValidationError, WizardError};
use crate::recommend::{self, DerivedRecommendations};
use crate::selection::{BasicInfo, SelectionState, SelectionStore};
use crate::submission::{Submission, Submitter};
use crate::sync::{self, ViewState};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

pub use intent::{Intent, Update};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Intro,
    BasicInfo,
    Destinations,
    Experiences,
}

impl WizardStep {
    pub fn following(self) -> Option<Self> {
        match self {
            WizardStep::Intro => Some(WizardStep::BasicInfo),
            WizardStep::BasicInfo => Some(WizardStep::Destinations),
            WizardStep::Destinations => Some(WizardStep::Experiences),
            WizardStep::Experiences => None,
        }
    }

    pub fn preceding(self) -> Option<Self> {
        match self {
            WizardStep::Intro => None,
            WizardStep::BasicInfo => Some(WizardStep::Intro),
            WizardStep::Destinations => Some(WizardStep::BasicInfo),
            WizardStep::Experiences => Some(WizardStep::Destinations),
        }
    }
}

/// One traveler's pass through the wizard.
///
/// Owns the selection store and the current step. Renderers talk to it through
/// [`WizardSession::dispatch`] and get back an [`Update`] describing what to redraw.
pub struct WizardSession {
    id: Uuid,
    step: WizardStep,
    store: SelectionStore,
    pending_basic_info: Option<BasicInfo>,
    submitter: Box<dyn Submitter>,
}

impl WizardSession {
    pub fn new(catalog: Arc<Catalog>, submitter: Box<dyn Submitter>) -> Self {
        let id = Uuid::new_v4();
        log::debug!("Wizard session {} started", id);
        Self {
            id,
            step: WizardStep::Intro,
            store: SelectionStore::new(catalog),
            pending_basic_info: None,
            submitter,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    pub fn snapshot(&self) -> SelectionState {
        self.store.snapshot()
    }

    pub fn recommendations(&self) -> DerivedRecommendations {
        recommend::derive(self.store.state(), self.store.catalog())
    }

    pub fn view(&self) -> ViewState {
        let recs = self.recommendations();
        ViewState::build(self.store.state(), &recs, self.store.catalog())
    }

    /// Full redraw payload for the current step.
    pub fn render(&self) -> Update {
        Update::StepChanged {
            step: self.step,
            state: self.snapshot(),
            recommendations: self.recommendations(),
        }
    }

    /// Handles one renderer intent. Form and toggle intents are only accepted
    /// on the step that shows their controls.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Update, WizardError> {
        if let Some(step) = intent.step() {
            if step != self.step {
                log::warn!("Session {}: ignoring {:?} on {:?}", self.id, intent, self.step);
                return Err(WizardError::OutOfStep(self.step));
            }
        }
        match intent {
            Intent::EditBasicInfo(info) => {
                self.edit_basic_info(info);
                Ok(Update::Unchanged)
            }
            Intent::ToggleDestination { category, place } => {
                self.mutate(|store| store.toggle_destination(&category, &place).map(|_| ()))
            }
            Intent::SetCategorySkip { category, skip } => self.mutate(|store| store.set_category_skip(&category, skip)),
            Intent::ToggleRegionSubSelection { region, place } => {
                self.mutate(|store| store.toggle_region_sub_selection(&region, &place).map(|_| ()))
            }
            Intent::SetRegionSkip { region, skip } => self.mutate(|store| store.set_region_skip(&region, skip)),
            Intent::ToggleExperience { name } => self.mutate(|store| {
                store.toggle_experience(&name);
                Ok(())
            }),
            Intent::Next => self.next(),
            Intent::Back => Ok(self.back()),
        }
    }

    /// Records the basic info form as typed so far. It reaches the store when
    /// the step is left.
    pub fn edit_basic_info(&mut self, info: BasicInfo) {
        self.pending_basic_info = Some(info);
    }

    pub fn next(&mut self) -> Result<Update, WizardError> {
        match self.step {
            WizardStep::Intro => {}
            WizardStep::BasicInfo => {
                let info = self.validated_basic_info()?;
                self.store.set_basic_info(info);
                self.pending_basic_info = None;
            }
            WizardStep::Destinations => {
                if self.store.state().destinations.is_empty() {
                    return Err(self.reject(ValidationError::NoDestinations));
                }
            }
            WizardStep::Experiences => return self.submit(),
        }
        Ok(self.advance_to(self.step.following()))
    }

    pub fn back(&mut self) -> Update {
        let Some(previous) = self.step.preceding() else {
            return Update::Unchanged;
        };
        if let Some(info) = self.pending_basic_info.take() {
            self.store.set_basic_info(info.trimmed());
        }
        self.advance_to(Some(previous))
    }

    fn advance_to(&mut self, step: Option<WizardStep>) -> Update {
        match step {
            Some(step) => {
                log::info!("Session {}: {:?} -> {:?}", self.id, self.step, step);
                self.step = step;
                self.render()
            }
            None => Update::Unchanged,
        }
    }

    fn validated_basic_info(&self) -> Result<BasicInfo, WizardError> {
        let info = self
            .pending_basic_info
            .as_ref()
            .unwrap_or(&self.store.state().basic_info)
            .trimmed();
        if info.full_name.is_empty() {
            return Err(self.reject(ValidationError::MissingFullName));
        }
        if info.country_of_residence.is_empty() {
            return Err(self.reject(ValidationError::MissingCountry));
        }
        Ok(info)
    }

    fn reject(&self, error: ValidationError) -> WizardError {
        log::debug!("Session {}: staying on {:?}: {}", self.id, self.step, error);
        error.into()
    }

    fn submit(&mut self) -> Result<Update, WizardError> {
        let submission = Submission::from(self.snapshot());
        if let Err(e) = self.submitter.submit(&submission) {
            log::error!("Session {}: submission failed: {:#}", self.id, e);
            return Err(WizardError::Submission(e.to_string()));
        }
        log::info!("Session {}: trip request submitted", self.id);
        Ok(Update::Submitted { submission })
    }

    /// Runs an in-step change and reports it as a patch against the previous view.
    fn mutate(&mut self, change: impl FnOnce(&mut SelectionStore) -> Result<(), WizardError>) -> Result<Update, WizardError> {
        let before = self.view();
        change(&mut self.store)?;
        let after = self.view();
        Ok(Update::Patched {
            patches: sync::diff(&before, &after),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;
    use crate::sync::Patch;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct RecordingSubmitter {
        received: Rc<RefCell<Vec<Submission>>>,
    }

    impl Submitter for RecordingSubmitter {
        fn submit(&mut self, submission: &Submission) -> anyhow::Result<()> {
            self.received.borrow_mut().push(submission.clone());
            Ok(())
        }
    }

    struct FailingSubmitter;

    impl Submitter for FailingSubmitter {
        fn submit(&mut self, _submission: &Submission) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }
    }

    fn session() -> (WizardSession, RecordingSubmitter) {
        let submitter = RecordingSubmitter::default();
        let session = WizardSession::new(default_catalog(), Box::new(submitter.clone()));
        (session, submitter)
    }

    fn info(name: &str, country: &str) -> BasicInfo {
        BasicInfo {
            full_name: name.to_string(),
            country_of_residence: country.to_string(),
            preferred_dates: String::new(),
        }
    }

    fn to_destinations(session: &mut WizardSession) {
        session.next().unwrap();
        session.edit_basic_info(info("Ana Novak", "Slovenia"));
        session.next().unwrap();
        assert_eq!(session.current_step(), WizardStep::Destinations);
    }

    #[test]
    fn test_step_order() {
        assert_eq!(WizardStep::Intro.following(), Some(WizardStep::BasicInfo));
        assert_eq!(WizardStep::Experiences.following(), None);
        assert_eq!(WizardStep::Intro.preceding(), None);
        assert_eq!(WizardStep::Experiences.preceding(), Some(WizardStep::Destinations));
    }

    #[test]
    fn test_intro_next_is_unconditional() {
        let (mut session, _) = session();
        let update = session.next().unwrap();
        assert!(matches!(update, Update::StepChanged { step: WizardStep::BasicInfo, .. }));
    }

    #[test]
    fn test_back_at_intro_is_a_no_op() {
        let (mut session, _) = session();
        assert_eq!(session.back(), Update::Unchanged);
        assert_eq!(session.current_step(), WizardStep::Intro);
    }

    #[test]
    fn test_basic_info_requires_name() {
        let (mut session, _) = session();
        session.next().unwrap();

        let err = session.next().unwrap_err();
        assert_eq!(err, WizardError::Validation(ValidationError::MissingFullName));
        assert_eq!(session.current_step(), WizardStep::BasicInfo);

        session.edit_basic_info(info("   ", "Slovenia"));
        let err = session.next().unwrap_err();
        assert_eq!(err.to_string(), "missing full name");
        assert_eq!(session.current_step(), WizardStep::BasicInfo);
        assert_eq!(session.snapshot().basic_info, BasicInfo::default());
    }

    #[test]
    fn test_basic_info_requires_country() {
        let (mut session, _) = session();
        session.next().unwrap();
        session.edit_basic_info(info("Ana Novak", ""));
        let err = session.next().unwrap_err();
        assert_eq!(err, WizardError::Validation(ValidationError::MissingCountry));
        assert_eq!(session.current_step(), WizardStep::BasicInfo);
    }

    #[test]
    fn test_basic_info_is_trimmed_and_committed() {
        let (mut session, _) = session();
        session.next().unwrap();
        session.edit_basic_info(BasicInfo {
            full_name: "  Ana Novak ".to_string(),
            country_of_residence: "Slovenia".to_string(),
            preferred_dates: " June ".to_string(),
        });
        session.next().unwrap();
        let committed = session.snapshot().basic_info;
        assert_eq!(committed.full_name, "Ana Novak");
        assert_eq!(committed.preferred_dates, "June");
    }

    #[test]
    fn test_back_persists_pending_basic_info() {
        let (mut session, _) = session();
        session.next().unwrap();
        session.edit_basic_info(info("", "Italy"));
        let update = session.back();
        assert!(matches!(update, Update::StepChanged { step: WizardStep::Intro, .. }));
        assert_eq!(session.snapshot().basic_info.country_of_residence, "Italy");

        // The committed draft is what the next validation sees.
        session.next().unwrap();
        assert_eq!(session.next().unwrap_err(), WizardError::Validation(ValidationError::MissingFullName));
    }

    #[test]
    fn test_back_stores_pending_basic_info_trimmed() {
        let (mut session, _) = session();
        session.next().unwrap();
        session.edit_basic_info(BasicInfo {
            full_name: "  Ana  ".to_string(),
            country_of_residence: "Italy".to_string(),
            preferred_dates: " June ".to_string(),
        });
        session.back();

        let stored = session.snapshot().basic_info;
        assert_eq!(stored.full_name, "Ana");
        assert_eq!(stored.country_of_residence, "Italy");
        assert_eq!(stored.preferred_dates, "June");
    }

    #[test]
    fn test_destinations_step_requires_a_destination() {
        let (mut session, _) = session();
        to_destinations(&mut session);

        let err = session.next().unwrap_err();
        assert_eq!(err.to_string(), "no destinations selected");
        assert_eq!(session.current_step(), WizardStep::Destinations);

        session
            .dispatch(Intent::ToggleDestination { category: "cities".to_string(), place: "Piran".to_string() })
            .unwrap();
        let update = session.next().unwrap();
        match update {
            Update::StepChanged { step, recommendations, .. } => {
                assert_eq!(step, WizardStep::Experiences);
                assert_eq!(recommendations.recommended_experiences, vec!["Swimming", "Boat Trips", "Sunsets"]);
            }
            other => panic!("unexpected update {:?}", other),
        }
    }

    #[test]
    fn test_toggles_produce_patches_not_redraws() {
        let (mut session, _) = session();
        to_destinations(&mut session);

        let update = session
            .dispatch(Intent::ToggleDestination {
                category: "regions".to_string(),
                place: "Alpine Slovenia".to_string(),
            })
            .unwrap();
        let Update::Patched { patches } = update else {
            panic!("expected a patch update");
        };
        assert!(patches.contains(&Patch::AddHighlight {
            place: "Bled".to_string(),
            reason: "Alpine Slovenia".to_string(),
        }));
        assert_eq!(session.current_step(), WizardStep::Destinations);

        let update = session
            .dispatch(Intent::ToggleRegionSubSelection {
                region: "Alpine Slovenia".to_string(),
                place: "Lake Bled".to_string(),
            })
            .unwrap();
        assert!(matches!(update, Update::Patched { .. }));
        let state = session.snapshot();
        assert_eq!(state.region_sub_selections["Alpine Slovenia"], vec!["Lake Bled"]);
        assert_eq!(state.region_skip.get("Alpine Slovenia"), Some(&false));
    }

    #[test]
    fn test_lookup_miss_leaves_session_usable() {
        let (mut session, _) = session();
        to_destinations(&mut session);
        let before = session.snapshot();

        let err = session
            .dispatch(Intent::SetRegionSkip { region: "Atlantis".to_string(), skip: true })
            .unwrap_err();
        assert!(matches!(err, WizardError::LookupMiss(_)));
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.current_step(), WizardStep::Destinations);
    }

    #[test]
    fn test_experiences_next_submits_and_stays() {
        let (mut session, submitter) = session();
        to_destinations(&mut session);
        session
            .dispatch(Intent::ToggleDestination { category: "regions".to_string(), place: "Prekmurje".to_string() })
            .unwrap();
        session.next().unwrap();
        session.dispatch(Intent::ToggleExperience { name: "Cycling".to_string() }).unwrap();

        let update = session.next().unwrap();
        assert!(matches!(update, Update::Submitted { .. }));
        assert_eq!(session.current_step(), WizardStep::Experiences);

        let received = submitter.received.borrow();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].basic_info.full_name, "Ana Novak");
        assert_eq!(received[0].destinations, vec!["Prekmurje"]);
        assert_eq!(received[0].experiences, vec!["Cycling"]);
    }

    #[test]
    fn test_failed_submission_is_reported() {
        let mut session = WizardSession::new(default_catalog(), Box::new(FailingSubmitter));
        to_destinations(&mut session);
        session
            .dispatch(Intent::ToggleDestination { category: "cities".to_string(), place: "Koper".to_string() })
            .unwrap();
        session.next().unwrap();

        let err = session.next().unwrap_err();
        assert_eq!(err, WizardError::Submission("connection refused".to_string()));
        assert_eq!(session.current_step(), WizardStep::Experiences);
        assert_eq!(session.snapshot().destinations, vec!["Koper"]);
    }

    #[test]
    fn test_back_from_experiences_keeps_selections() {
        let (mut session, _) = session();
        to_destinations(&mut session);
        session
            .dispatch(Intent::ToggleDestination { category: "cities".to_string(), place: "Bled".to_string() })
            .unwrap();
        session.next().unwrap();
        session.dispatch(Intent::ToggleExperience { name: "Hiking".to_string() }).unwrap();

        let update = session.dispatch(Intent::Back).unwrap();
        match update {
            Update::StepChanged { step, state, .. } => {
                assert_eq!(step, WizardStep::Destinations);
                assert_eq!(state.destinations, vec!["Bled"]);
                assert_eq!(state.experiences, vec!["Hiking"]);
            }
            other => panic!("unexpected update {:?}", other),
        }
    }

    #[test]
    fn test_destination_changes_rejected_after_leaving_the_step() {
        let (mut session, submitter) = session();
        to_destinations(&mut session);
        session
            .dispatch(Intent::ToggleDestination { category: "cities".to_string(), place: "Piran".to_string() })
            .unwrap();
        session.next().unwrap();
        assert_eq!(session.current_step(), WizardStep::Experiences);

        let err = session
            .dispatch(Intent::ToggleDestination { category: "cities".to_string(), place: "Piran".to_string() })
            .unwrap_err();
        assert_eq!(err, WizardError::OutOfStep(WizardStep::Experiences));
        assert_eq!(session.snapshot().destinations, vec!["Piran"]);

        session.next().unwrap();
        assert_eq!(submitter.received.borrow()[0].destinations, vec!["Piran"]);
    }

    #[test]
    fn test_intents_are_scoped_to_their_step() {
        let (mut session, _) = session();

        let err = session
            .dispatch(Intent::EditBasicInfo(info("Ana Novak", "Slovenia")))
            .unwrap_err();
        assert_eq!(err, WizardError::OutOfStep(WizardStep::Intro));

        to_destinations(&mut session);
        let before = session.snapshot();
        let err = session
            .dispatch(Intent::ToggleExperience { name: "Hiking".to_string() })
            .unwrap_err();
        assert_eq!(err, WizardError::OutOfStep(WizardStep::Destinations));
        assert_eq!(session.snapshot(), before);

        assert!(matches!(session.dispatch(Intent::Back), Ok(Update::StepChanged { .. })));
    }
}
