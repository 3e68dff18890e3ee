use crate::errors::CatalogError;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

const DEFAULT_CATALOG: &str = include_str!("default_catalog.yaml");

static DEFAULT: Lazy<Arc<Catalog>> = Lazy::new(|| {
    Arc::new(Catalog::from_yaml_str(DEFAULT_CATALOG).expect("Failed to parse the embedded catalog"))
});

/// Returns the catalog that ships with the binary.
pub fn default_catalog() -> Arc<Catalog> {
    Arc::clone(&DEFAULT)
}

/// A flat group of selectable destinations (cities, castles, ...).
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Category {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub skippable: bool,
    pub places: Vec<String>,
}

/// Extra detail for a region: the places inside it and the city we suggest for it.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RegionDetail {
    pub name: String,
    #[serde(default)]
    pub sub_places: Vec<String>,
    #[serde(default)]
    pub suggested_city: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ExperienceCategory {
    pub key: String,
    pub label: String,
    pub experiences: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default = "default_region_category")]
    region_category: String,
    categories: Vec<Category>,
    #[serde(default)]
    regions: Vec<RegionDetail>,
    #[serde(default)]
    experience_suggestions: HashMap<String, Vec<String>>,
    #[serde(default)]
    experience_categories: Vec<ExperienceCategory>,
    #[serde(default)]
    countries: Vec<String>,
}

fn default_region_category() -> String {
    "regions".to_string()
}

/// Read-only destination data. Built once and shared between sessions.
#[derive(Debug)]
pub struct Catalog {
    region_category: String,
    categories: Vec<Category>,
    regions: Vec<RegionDetail>,
    experience_suggestions: HashMap<String, Vec<String>>,
    experience_categories: Vec<ExperienceCategory>,
    countries: Vec<String>,
    category_index: HashMap<String, usize>,
    region_index: HashMap<String, usize>,
}

impl Catalog {
    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(content)?;
        Self::build(file)
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_yaml_str(&content)?;
        log::debug!(
            "Loaded catalog from {}: {} categories, {} region details",
            path.display(),
            catalog.categories.len(),
            catalog.regions.len()
        );
        Ok(catalog)
    }

    fn build(file: CatalogFile) -> Result<Self, CatalogError> {
        let mut category_index = HashMap::new();
        for (i, category) in file.categories.iter().enumerate() {
            if category_index.insert(category.key.clone(), i).is_some() {
                return Err(CatalogError::Invalid(format!("duplicate category `{}`", category.key)));
            }
            let mut seen = HashSet::new();
            for place in &category.places {
                if !seen.insert(place.as_str()) {
                    return Err(CatalogError::Invalid(format!(
                        "place `{}` is listed twice in `{}`",
                        place, category.key
                    )));
                }
            }
        }

        let region_places = match category_index.get(&file.region_category) {
            Some(&i) => &file.categories[i].places,
            None => {
                return Err(CatalogError::Invalid(format!(
                    "region category `{}` is not defined",
                    file.region_category
                )));
            }
        };

        let mut region_index = HashMap::new();
        for (i, region) in file.regions.iter().enumerate() {
            if !region_places.contains(&region.name) {
                return Err(CatalogError::Invalid(format!(
                    "region `{}` is not listed in `{}`",
                    region.name, file.region_category
                )));
            }
            if region_index.insert(region.name.clone(), i).is_some() {
                return Err(CatalogError::Invalid(format!("region `{}` is described twice", region.name)));
            }
        }

        Ok(Self {
            region_category: file.region_category,
            categories: file.categories,
            regions: file.regions,
            experience_suggestions: file.experience_suggestions,
            experience_categories: file.experience_categories,
            countries: file.countries,
            category_index,
            region_index,
        })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, key: &str) -> Option<&Category> {
        self.category_index.get(key).map(|&i| &self.categories[i])
    }

    pub fn is_skippable(&self, key: &str) -> bool {
        self.category(key).is_some_and(|c| c.skippable)
    }

    pub fn region_category(&self) -> &str {
        &self.region_category
    }

    /// Region names in declaration order.
    pub fn region_names(&self) -> &[String] {
        self.category(&self.region_category)
            .map(|c| c.places.as_slice())
            .unwrap_or_default()
    }

    pub fn is_region(&self, name: &str) -> bool {
        self.region_names().iter().any(|r| r == name)
    }

    pub fn region_detail(&self, region: &str) -> Option<&RegionDetail> {
        self.region_index.get(region).map(|&i| &self.regions[i])
    }

    pub fn sub_places(&self, region: &str) -> &[String] {
        self.region_detail(region)
            .map(|r| r.sub_places.as_slice())
            .unwrap_or_default()
    }

    /// `(region, city)` pairs in the order the regions were declared.
    pub fn suggested_cities(&self) -> impl Iterator<Item = (&str, &str)> {
        self.regions
            .iter()
            .filter_map(|r| r.suggested_city.as_deref().map(|city| (r.name.as_str(), city)))
    }

    pub fn suggested_experiences(&self, destination: &str) -> &[String] {
        self.experience_suggestions
            .get(destination)
            .map(|e| e.as_slice())
            .unwrap_or_default()
    }

    pub fn experience_categories(&self) -> &[ExperienceCategory] {
        &self.experience_categories
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }
}
