//! Validated, ordered set of category definitions.

use thiserror::Error;

use crate::models::Category;

#[derive(Debug, Error, PartialEq)]
pub enum TaxonomyError {
    #[error("category name must not be empty")]
    EmptyName,
    #[error("duplicate category name: {0}")]
    DuplicateName(String),
}

/// The full set of categories available to the engine, in insertion order.
///
/// Insertion order is significant: on exact confidence ties the earliest
/// category wins. A `Taxonomy` is immutable once built; replacing categories
/// means building a new one and swapping the classifier that holds it.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    /// Builds a taxonomy, rejecting empty and duplicate category names.
    pub fn new(categories: Vec<Category>) -> Result<Self, TaxonomyError> {
        let mut seen = std::collections::HashSet::new();
        for category in &categories {
            if category.name.is_empty() {
                return Err(TaxonomyError::EmptyName);
            }
            if !seen.insert(category.name.as_str()) {
                return Err(TaxonomyError::DuplicateName(category.name.clone()));
            }
        }
        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
