use crate::catalog::Catalog;
use crate::errors::{LookupKind, LookupMiss, WizardError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicInfo {
    pub full_name: String,
    pub country_of_residence: String,
    pub preferred_dates: String,
}

impl BasicInfo {
    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            country_of_residence: self.country_of_residence.trim().to_string(),
            preferred_dates: self.preferred_dates.trim().to_string(),
        }
    }
}

/// Everything the traveler has picked so far.
///
/// Values of this type handed out by [`SelectionStore::snapshot`] are copies;
/// editing them has no effect on the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub basic_info: BasicInfo,
    /// Chosen top-level places across all categories, in the order they were picked.
    pub destinations: Vec<String>,
    /// Region -> chosen sub-places. A region without an entry has nothing chosen.
    pub region_sub_selections: BTreeMap<String, Vec<String>>,
    pub region_skip: BTreeMap<String, bool>,
    pub category_skip: BTreeMap<String, bool>,
    pub experiences: Vec<String>,
}

impl SelectionState {
    pub fn has_destination(&self, place: &str) -> bool {
        self.destinations.iter().any(|d| d == place)
    }

    pub fn has_experience(&self, name: &str) -> bool {
        self.experiences.iter().any(|e| e == name)
    }

    pub fn is_category_skipped(&self, category: &str) -> bool {
        self.category_skip.get(category).copied().unwrap_or(false)
    }

    pub fn is_region_skipped(&self, region: &str) -> bool {
        self.region_skip.get(region).copied().unwrap_or(false)
    }

    pub fn sub_selection(&self, region: &str) -> &[String] {
        self.region_sub_selections
            .get(region)
            .map(|s| s.as_slice())
            .unwrap_or_default()
    }
}

/// Sole owner of a session's [`SelectionState`].
///
/// Every mutation applies its paired updates (skip flag plus the selections it
/// clears) in one go, so the skip/selection exclusivity rules hold whenever a
/// call returns. Input naming something the catalog does not know is logged and
/// ignored.
pub struct SelectionStore {
    catalog: Arc<Catalog>,
    state: SelectionState,
}

fn miss(kind: LookupKind, name: &str) -> WizardError {
    log::warn!("Ignoring selection change for unknown {} `{}`", kind, name);
    LookupMiss::new(kind, name).into()
}

fn toggle_member(set: &mut Vec<String>, value: &str) -> bool {
    match set.iter().position(|v| v == value) {
        Some(i) => {
            set.remove(i);
            false
        }
        None => {
            set.push(value.to_string());
            true
        }
    }
}

impl SelectionStore {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            state: SelectionState::default(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Read-only view of the live state.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn snapshot(&self) -> SelectionState {
        self.state.clone()
    }

    pub fn set_basic_info(&mut self, info: BasicInfo) {
        self.state.basic_info = info;
    }

    /// Flips `place` in the destination set and returns whether it is now selected.
    pub fn toggle_destination(&mut self, category: &str, place: &str) -> Result<bool, WizardError> {
        let catalog = Arc::clone(&self.catalog);
        let def = catalog.category(category).ok_or_else(|| miss(LookupKind::Category, category))?;
        if !def.places.iter().any(|p| p == place) {
            return Err(miss(LookupKind::Place, place));
        }

        let selected = toggle_member(&mut self.state.destinations, place);
        if !selected && catalog.is_region(place) {
            self.clear_region(place);
        }
        // Touching a skippable category always clears its own skip flag.
        if def.skippable {
            self.state.category_skip.insert(category.to_string(), false);
        }
        log::debug!("Destination `{}` in `{}` selected={}", place, category, selected);
        Ok(selected)
    }

    pub fn set_category_skip(&mut self, category: &str, skip: bool) -> Result<(), WizardError> {
        let catalog = Arc::clone(&self.catalog);
        let def = catalog.category(category).ok_or_else(|| miss(LookupKind::Category, category))?;
        if !def.skippable {
            return Err(miss(LookupKind::SkippableCategory, category));
        }

        self.state.category_skip.insert(category.to_string(), skip);
        if skip {
            let removed: Vec<String> = self
                .state
                .destinations
                .iter()
                .filter(|d| def.places.contains(*d))
                .cloned()
                .collect();
            self.state.destinations.retain(|d| !def.places.contains(d));
            for place in removed.iter().filter(|p| catalog.is_region(p)) {
                self.clear_region(place);
            }
            log::debug!("Category `{}` skipped, {} destination(s) dropped", category, removed.len());
        }
        Ok(())
    }

    pub fn set_region_skip(&mut self, region: &str, skip: bool) -> Result<(), WizardError> {
        self.ensure_selected_region(region)?;
        self.state.region_skip.insert(region.to_string(), skip);
        if skip {
            self.state.region_sub_selections.remove(region);
        }
        Ok(())
    }

    /// Flips `sub_place` under `region` and returns whether it is now chosen.
    pub fn toggle_region_sub_selection(&mut self, region: &str, sub_place: &str) -> Result<bool, WizardError> {
        self.ensure_selected_region(region)?;
        if !self.catalog.sub_places(region).iter().any(|p| p == sub_place) {
            return Err(miss(LookupKind::SubPlace, sub_place));
        }

        self.state.region_skip.insert(region.to_string(), false);
        let chosen = self.state.region_sub_selections.entry(region.to_string()).or_default();
        let selected = toggle_member(chosen, sub_place);
        if chosen.is_empty() {
            self.state.region_sub_selections.remove(region);
        }
        Ok(selected)
    }

    pub fn toggle_experience(&mut self, name: &str) -> bool {
        toggle_member(&mut self.state.experiences, name)
    }

    fn ensure_selected_region(&self, region: &str) -> Result<(), WizardError> {
        if !self.catalog.is_region(region) {
            return Err(miss(LookupKind::Region, region));
        }
        if !self.state.has_destination(region) {
            log::warn!("Ignoring change to region `{}` because it is not selected", region);
            return Err(WizardError::RegionNotSelected(region.to_string()));
        }
        Ok(())
    }

    fn clear_region(&mut self, region: &str) {
        self.state.region_sub_selections.remove(region);
        self.state.region_skip.remove(region);
    }
}
