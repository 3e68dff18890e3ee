pub mod diff;

use crate::catalog::Catalog;
use crate::recommend::DerivedRecommendations;
use crate::selection::SelectionState;
use serde::Serialize;
use std::collections::BTreeMap;

pub use diff::{diff, Patch};

/// One checkbox in a destination category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub place: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    pub key: String,
    /// `None` for categories without a "skip" checkbox.
    pub skipped: Option<bool>,
    pub options: Vec<OptionView>,
}

impl CategoryView {
    pub fn option(&self, place: &str) -> Option<&OptionView> {
        self.options.iter().find(|o| o.place == place)
    }
}

/// The "pick specific destinations in ..." block shown under a selected region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionSection {
    pub region: String,
    pub skipped: bool,
    pub places: Vec<OptionView>,
}

impl RegionSection {
    /// The sub-place list is hidden while the region is skipped.
    pub fn list_visible(&self) -> bool {
        !self.skipped
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExperienceView {
    pub checked: bool,
    pub recommended: bool,
}

/// What a renderer shows for the destination and experience steps.
///
/// Built from state; a renderer keeps its own copy current by applying the
/// patches produced by [`diff`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub categories: Vec<CategoryView>,
    /// Place -> region named on its "recommended" badge.
    pub highlights: BTreeMap<String, String>,
    pub region_sections: BTreeMap<String, RegionSection>,
    pub experiences: BTreeMap<String, ExperienceView>,
}

impl ViewState {
    pub fn build(state: &SelectionState, recs: &DerivedRecommendations, catalog: &Catalog) -> Self {
        let mut view = ViewState::default();

        for category in catalog.categories() {
            let options = category
                .places
                .iter()
                .map(|place| {
                    if let Some(reason) = recs.city_reason(place) {
                        view.highlights.insert(place.clone(), reason.to_string());
                    }
                    OptionView {
                        place: place.clone(),
                        checked: state.has_destination(place),
                    }
                })
                .collect();
            view.categories.push(CategoryView {
                key: category.key.clone(),
                skipped: category.skippable.then(|| state.is_category_skipped(&category.key)),
                options,
            });
        }

        for region in catalog.region_names() {
            let sub_places = catalog.sub_places(region);
            if sub_places.is_empty() || !state.has_destination(region) {
                continue;
            }
            let chosen = state.sub_selection(region);
            let places = sub_places
                .iter()
                .map(|place| OptionView {
                    place: place.clone(),
                    checked: chosen.contains(place),
                })
                .collect();
            view.region_sections.insert(
                region.clone(),
                RegionSection {
                    region: region.clone(),
                    skipped: state.is_region_skipped(region),
                    places,
                },
            );
        }

        let offered = catalog
            .experience_categories()
            .iter()
            .flat_map(|c| c.experiences.iter())
            .chain(recs.recommended_experiences.iter())
            .chain(state.experiences.iter());
        for name in offered {
            view.experiences.insert(
                name.clone(),
                ExperienceView {
                    checked: state.has_experience(name),
                    recommended: recs.is_recommended_experience(name),
                },
            );
        }

        view
    }

    pub fn category(&self, key: &str) -> Option<&CategoryView> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Applies a patch the way a renderer would. Every patch carries absolute
    /// values, so applying the same list again changes nothing.
    pub fn apply(&mut self, patch: &Patch) {
        match patch {
            Patch::SetOptionChecked { category, place, checked } => {
                if let Some(option) = self
                    .categories
                    .iter_mut()
                    .find(|c| &c.key == category)
                    .and_then(|c| c.options.iter_mut().find(|o| &o.place == place))
                {
                    option.checked = *checked;
                }
            }
            Patch::SetCategorySkip { category, skipped } => {
                if let Some(view) = self.categories.iter_mut().find(|c| &c.key == category) {
                    view.skipped = Some(*skipped);
                }
            }
            Patch::AddHighlight { place, reason } => {
                self.highlights.insert(place.clone(), reason.clone());
            }
            Patch::RemoveHighlight { place } => {
                self.highlights.remove(place);
            }
            Patch::CreateRegionSection { section } => {
                self.region_sections.insert(section.region.clone(), section.clone());
            }
            Patch::RemoveRegionSection { region } => {
                self.region_sections.remove(region);
            }
            Patch::SetRegionSkip { region, skipped } => {
                if let Some(section) = self.region_sections.get_mut(region) {
                    section.skipped = *skipped;
                }
            }
            Patch::SetSubPlaceChecked { region, place, checked } => {
                if let Some(option) = self
                    .region_sections
                    .get_mut(region)
                    .and_then(|s| s.places.iter_mut().find(|o| &o.place == place))
                {
                    option.checked = *checked;
                }
            }
            Patch::SetExperienceChecked { name, checked } => {
                self.experiences.entry(name.clone()).or_default().checked = *checked;
            }
            Patch::SetExperienceRecommended { name, recommended } => {
                self.experiences.entry(name.clone()).or_default().recommended = *recommended;
            }
            Patch::RemoveExperience { name } => {
                self.experiences.remove(name);
            }
        }
    }

    pub fn apply_all(&mut self, patches: &[Patch]) {
        for patch in patches {
            self.apply(patch);
        }
    }
}
