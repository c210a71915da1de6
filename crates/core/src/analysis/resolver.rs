//! Dependency expansion over the analysis catalog.

use std::collections::{HashSet, VecDeque};

use super::catalog::{Catalog, CatalogError};
use super::kind::AnalysisKind;

/// Computes the full set of analyses needed to satisfy a request.
///
/// Expansion is breadth-first: the requested kind comes first, then its direct
/// dependencies in catalog order, then theirs. Every kind appears once and the
/// first position a kind is seen at is the one it keeps.
#[derive(Debug, Clone, Copy)]
pub struct DependencyResolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// `requested` followed by all of its transitive dependencies.
    pub fn expand(&self, requested: AnalysisKind) -> Result<Vec<AnalysisKind>, CatalogError> {
        self.expand_set([requested])
    }

    /// Every kind in the catalog.
    ///
    /// The catalog is closed under its dependency relation, so this is already
    /// a complete expansion.
    pub fn expand_all(&self) -> Vec<AnalysisKind> {
        self.catalog.all_kinds().to_vec()
    }

    /// Union of [`expand`](Self::expand) over `kinds`, preserving first-seen
    /// order. Expanding an already expanded set returns it unchanged.
    pub fn expand_set<I>(&self, kinds: I) -> Result<Vec<AnalysisKind>, CatalogError>
    where
        I: IntoIterator<Item = AnalysisKind>,
    {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();

        for root in kinds {
            if !seen.insert(root) {
                continue;
            }
            // Fail before anything is returned if the root itself is unknown
            self.catalog.dependencies(root)?;
            ordered.push(root);

            let mut queue = VecDeque::from([root]);
            while let Some(kind) = queue.pop_front() {
                for dep in self.catalog.dependencies(kind)? {
                    if seen.insert(*dep) {
                        ordered.push(*dep);
                        queue.push_back(*dep);
                    }
                }
            }
        }

        Ok(ordered)
    }
}
