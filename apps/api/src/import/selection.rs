use std::collections::HashSet;

use thiserror::Error;

use crate::models::repository::RepositorySnapshot;

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("repository '{0}' is not in the current catalog")]
    UnknownRepository(String),
}

/// The user's chosen repositories. Always a subset of the catalog it was built for;
/// replacing the catalog clears it.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    catalog: HashSet<String>,
    selected: HashSet<String>,
}

impl SelectionSet {
    pub fn for_catalog(repos: &[RepositorySnapshot]) -> Self {
        let mut selection = Self::default();
        selection.replace_catalog(repos);
        selection
    }

    /// Swaps in a new catalog and drops every selection made against the old one.
    pub fn replace_catalog(&mut self, repos: &[RepositorySnapshot]) {
        self.catalog = repos.iter().map(|r| r.name.clone()).collect();
        self.reset();
    }

    /// Flips membership of `name`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, name: &str) -> Result<bool, SelectionError> {
        if !self.catalog.contains(name) {
            return Err(SelectionError::UnknownRepository(name.to_string()));
        }
        let selected = if self.selected.remove(name) {
            false
        } else {
            self.selected.insert(name.to_string());
            true
        };
        debug_assert!(self.is_subset_of_catalog());
        Ok(selected)
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    pub fn reset(&mut self) {
        self.selected.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected snapshots in catalog order.
    pub fn pick(&self, repos: &[RepositorySnapshot]) -> Vec<RepositorySnapshot> {
        repos
            .iter()
            .filter(|r| self.is_selected(&r.name))
            .cloned()
            .collect()
    }

    /// Selected names in catalog order.
    pub fn names_in(&self, repos: &[RepositorySnapshot]) -> Vec<String> {
        repos
            .iter()
            .filter(|r| self.is_selected(&r.name))
            .map(|r| r.name.clone())
            .collect()
    }

    fn is_subset_of_catalog(&self) -> bool {
        self.selected.is_subset(&self.catalog)
    }
}
