use super::{CategoryView, RegionSection, ViewState};

use serde::Serialize;

/// A single change a renderer has to make to bring its view up to date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Patch {
    SetOptionChecked { category: String, place: String, checked: bool },
    /// Also shows or hides the category's option list.
    SetCategorySkip { category: String, skipped: bool },
    /// Adds the "recommended" badge, or changes the region it names.
    AddHighlight { place: String, reason: String },
    RemoveHighlight { place: String },
    CreateRegionSection { section: RegionSection },
    RemoveRegionSection { region: String },
    /// Also shows or hides the region's sub-place list.
    SetRegionSkip { region: String, skipped: bool },
    SetSubPlaceChecked { region: String, place: String, checked: bool },
    SetExperienceChecked { name: String, checked: bool },
    SetExperienceRecommended { name: String, recommended: bool },
    /// Drops an experience that is no longer offered in any list.
    RemoveExperience { name: String },
}

/// Compares two views and returns the patches that turn `old_view` into `new_view`.
pub fn diff(old_view: &ViewState, new_view: &ViewState) -> Vec<Patch> {
    let mut patches = Vec::new();

    for new_category in &new_view.categories {
        let old_category = old_view.category(&new_category.key);
        diff_category(old_category, new_category, &mut patches);
    }

    diff_highlights(old_view, new_view, &mut patches);
    diff_region_sections(old_view, new_view, &mut patches);
    diff_experiences(old_view, new_view, &mut patches);

    patches
}

fn diff_category(old_category: Option<&CategoryView>, new_category: &CategoryView, patches: &mut Vec<Patch>) {
    let old_skipped = old_category.and_then(|c| c.skipped);
    if let Some(skipped) = new_category.skipped {
        if old_skipped != Some(skipped) {
            patches.push(Patch::SetCategorySkip {
                category: new_category.key.clone(),
                skipped,
            });
        }
    }

    for option in &new_category.options {
        let was_checked = old_category
            .and_then(|c| c.option(&option.place))
            .is_some_and(|o| o.checked);
        if was_checked != option.checked {
            patches.push(Patch::SetOptionChecked {
                category: new_category.key.clone(),
                place: option.place.clone(),
                checked: option.checked,
            });
        }
    }
}

fn diff_highlights(old_view: &ViewState, new_view: &ViewState, patches: &mut Vec<Patch>) {
    for place in old_view.highlights.keys() {
        if !new_view.highlights.contains_key(place) {
            patches.push(Patch::RemoveHighlight { place: place.clone() });
        }
    }
    for (place, reason) in &new_view.highlights {
        if old_view.highlights.get(place) != Some(reason) {
            patches.push(Patch::AddHighlight {
                place: place.clone(),
                reason: reason.clone(),
            });
        }
    }
}

fn diff_region_sections(old_view: &ViewState, new_view: &ViewState, patches: &mut Vec<Patch>) {
    for region in old_view.region_sections.keys() {
        if !new_view.region_sections.contains_key(region) {
            patches.push(Patch::RemoveRegionSection { region: region.clone() });
        }
    }

    for (region, new_section) in &new_view.region_sections {
        let Some(old_section) = old_view.region_sections.get(region) else {
            patches.push(Patch::CreateRegionSection {
                section: new_section.clone(),
            });
            continue;
        };
        update_region_section(old_section, new_section, patches);
    }
}

fn update_region_section(old_section: &RegionSection, new_section: &RegionSection, patches: &mut Vec<Patch>) {
    if old_section.skipped != new_section.skipped {
        patches.push(Patch::SetRegionSkip {
            region: new_section.region.clone(),
            skipped: new_section.skipped,
        });
    }

    for option in &new_section.places {
        let was_checked = old_section
            .places
            .iter()
            .find(|o| o.place == option.place)
            .is_some_and(|o| o.checked);
        if was_checked != option.checked {
            patches.push(Patch::SetSubPlaceChecked {
                region: new_section.region.clone(),
                place: option.place.clone(),
                checked: option.checked,
            });
        }
    }
}

fn diff_experiences(old_view: &ViewState, new_view: &ViewState, patches: &mut Vec<Patch>) {
    for (name, new_exp) in &new_view.experiences {
        let old_exp = old_view.experiences.get(name).copied().unwrap_or_default();
        if old_exp.checked != new_exp.checked {
            patches.push(Patch::SetExperienceChecked {
                name: name.clone(),
                checked: new_exp.checked,
            });
        }
        if old_exp.recommended != new_exp.recommended {
            patches.push(Patch::SetExperienceRecommended {
                name: name.clone(),
                recommended: new_exp.recommended,
            });
        }
    }

    for name in old_view.experiences.keys() {
        if !new_view.experiences.contains_key(name) {
            patches.push(Patch::RemoveExperience { name: name.clone() });
        }
    }
}
