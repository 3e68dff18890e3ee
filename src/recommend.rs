use crate::catalog::Catalog;
use crate::selection::SelectionState;
use serde::Serialize;
use std::collections::BTreeMap;

/// Suggestions derived from the current selections. Never stored; rebuild it
/// with [`derive`] whenever the selection changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedRecommendations {
    /// City -> the selected region that caused the suggestion.
    pub recommended_cities: BTreeMap<String, String>,
    /// Deduplicated, in the order the destinations were picked.
    pub recommended_experiences: Vec<String>,
}

impl DerivedRecommendations {
    pub fn city_reason(&self, city: &str) -> Option<&str> {
        self.recommended_cities.get(city).map(String::as_str)
    }

    pub fn is_recommended_experience(&self, name: &str) -> bool {
        self.recommended_experiences.iter().any(|e| e == name)
    }
}

pub fn derive(state: &SelectionState, catalog: &Catalog) -> DerivedRecommendations {
    DerivedRecommendations {
        recommended_cities: recommended_cities(state, catalog),
        recommended_experiences: recommended_experiences(state, catalog),
    }
}

fn recommended_cities(state: &SelectionState, catalog: &Catalog) -> BTreeMap<String, String> {
    let mut cities = BTreeMap::new();
    for (region, city) in catalog.suggested_cities() {
        if !state.has_destination(region) {
            continue;
        }
        // The first region (in catalog order) pointing at a city gives the reason.
        cities.entry(city.to_string()).or_insert_with(|| region.to_string());
    }
    cities
}

fn recommended_experiences(state: &SelectionState, catalog: &Catalog) -> Vec<String> {
    let mut experiences: Vec<String> = Vec::new();
    for destination in &state.destinations {
        for experience in catalog.suggested_experiences(destination) {
            if !experiences.contains(experience) {
                experiences.push(experience.clone());
            }
        }
    }
    experiences
}
