//! Static registry of analysis kinds and their dependencies.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use super::kind::AnalysisKind;
use super::resolver::DependencyResolver;

/// Errors raised while building or querying the catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The name or kind is not registered in the catalog.
    #[error("unknown analysis kind: {0}")]
    UnknownAnalysisKind(String),

    /// A dependency points at a kind that has no entry of its own.
    #[error("analysis {kind} depends on unregistered analysis {dependency}")]
    UnregisteredDependency {
        kind: AnalysisKind,
        dependency: AnalysisKind,
    },

    /// The same kind was registered twice.
    #[error("analysis {0} registered more than once")]
    DuplicateEntry(AnalysisKind),

    /// The dependency relation loops back on itself.
    #[error("dependency cycle: {}", format_cycle(.0))]
    Cycle(Vec<AnalysisKind>),
}

fn format_cycle(path: &[AnalysisKind]) -> String {
    path.iter()
        .map(AnalysisKind::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Built-in dependency table, in catalog order.
const BUILTIN: &[(AnalysisKind, &[AnalysisKind])] = &[
    (AnalysisKind::Transcription, &[]),
    (AnalysisKind::Audio, &[]),
    (AnalysisKind::AudioGaps, &[AnalysisKind::Audio]),
    (AnalysisKind::NoiseDetection, &[AnalysisKind::Audio]),
    (AnalysisKind::Silence, &[AnalysisKind::Audio]),
    (AnalysisKind::Volume, &[AnalysisKind::Audio]),
    (AnalysisKind::BackgroundPeople, &[]),
    (AnalysisKind::ExcessiveGestures, &[]),
    (AnalysisKind::Metrics, &[AnalysisKind::Transcription]),
    (AnalysisKind::LanguageComplexity, &[AnalysisKind::Transcription]),
    (AnalysisKind::LanguageErrors, &[AnalysisKind::Transcription]),
    (AnalysisKind::EmotionalAnalysis, &[AnalysisKind::Transcription]),
    (AnalysisKind::TargetGroup, &[AnalysisKind::Transcription]),
    (AnalysisKind::TopicChange, &[AnalysisKind::Transcription]),
    (AnalysisKind::Jargon, &[AnalysisKind::Transcription]),
    (AnalysisKind::Numbers, &[AnalysisKind::Transcription]),
    (AnalysisKind::DifficultWords, &[AnalysisKind::Transcription]),
    (AnalysisKind::LongSentences, &[AnalysisKind::Transcription]),
    (AnalysisKind::Repetition, &[AnalysisKind::Transcription]),
    (
        AnalysisKind::QualitySummary,
        &[
            AnalysisKind::Transcription,
            AnalysisKind::AudioGaps,
            AnalysisKind::NoiseDetection,
        ],
    ),
];

/// One catalog entry, as exposed to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub kind: AnalysisKind,
    pub dependencies: Vec<AnalysisKind>,
}

/// Mapping from analysis kind to the kinds it directly depends on.
///
/// A `Catalog` is validated when it is built: every dependency is registered
/// and the relation is acyclic. It is read-only afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    kinds: Vec<AnalysisKind>,
    dependencies: HashMap<AnalysisKind, Vec<AnalysisKind>>,
}

impl Catalog {
    /// Build a catalog from `(kind, dependencies)` entries.
    ///
    /// Entry order becomes the catalog order. Duplicate dependencies within an
    /// entry are dropped, keeping the first occurrence.
    pub fn new<I, D>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (AnalysisKind, D)>,
        D: IntoIterator<Item = AnalysisKind>,
    {
        let mut kinds = Vec::new();
        let mut dependencies = HashMap::new();

        for (kind, deps) in entries {
            let mut ordered: Vec<AnalysisKind> = Vec::new();
            for dep in deps {
                if !ordered.contains(&dep) {
                    ordered.push(dep);
                }
            }
            if dependencies.insert(kind, ordered).is_some() {
                return Err(CatalogError::DuplicateEntry(kind));
            }
            kinds.push(kind);
        }

        let catalog = Self {
            kinds,
            dependencies,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The built-in catalog.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(BUILTIN.iter().map(|(kind, deps)| (*kind, deps.iter().copied())))
    }

    /// Direct dependencies of `kind`, in registration order.
    pub fn dependencies(&self, kind: AnalysisKind) -> Result<&[AnalysisKind], CatalogError> {
        self.dependencies
            .get(&kind)
            .map(Vec::as_slice)
            .ok_or_else(|| CatalogError::UnknownAnalysisKind(kind.to_string()))
    }

    /// Every registered kind, in catalog order.
    pub fn all_kinds(&self) -> &[AnalysisKind] {
        &self.kinds
    }

    /// Whether `kind` has an entry.
    pub fn contains(&self, kind: AnalysisKind) -> bool {
        self.dependencies.contains_key(&kind)
    }

    /// Resolve a wire name to a registered kind.
    pub fn lookup(&self, name: &str) -> Result<AnalysisKind, CatalogError> {
        let kind: AnalysisKind = name.parse()?;
        if self.contains(kind) {
            Ok(kind)
        } else {
            Err(CatalogError::UnknownAnalysisKind(name.to_string()))
        }
    }

    /// Catalog entries for listing.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.kinds
            .iter()
            .map(|kind| CatalogEntry {
                kind: *kind,
                dependencies: self.dependencies.get(kind).cloned().unwrap_or_default(),
            })
            .collect()
    }

    /// Dependency resolver over this catalog.
    pub fn resolver(&self) -> DependencyResolver<'_> {
        DependencyResolver::new(self)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for kind in &self.kinds {
            for dep in &self.dependencies[kind] {
                if !self.contains(*dep) {
                    return Err(CatalogError::UnregisteredDependency {
                        kind: *kind,
                        dependency: *dep,
                    });
                }
            }
        }

        let mut marks: HashMap<AnalysisKind, Mark> = HashMap::new();
        let mut path = Vec::new();
        for kind in &self.kinds {
            self.visit(*kind, &mut marks, &mut path)?;
        }
        Ok(())
    }

    fn visit(
        &self,
        kind: AnalysisKind,
        marks: &mut HashMap<AnalysisKind, Mark>,
        path: &mut Vec<AnalysisKind>,
    ) -> Result<(), CatalogError> {
        match marks.get(&kind) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                let start = path.iter().position(|k| *k == kind).unwrap_or(0);
                let mut cycle = path[start..].to_vec();
                cycle.push(kind);
                return Err(CatalogError::Cycle(cycle));
            }
            None => {}
        }

        marks.insert(kind, Mark::Visiting);
        path.push(kind);
        for dep in &self.dependencies[&kind] {
            self.visit(*dep, marks, path)?;
        }
        path.pop();
        marks.insert(kind, Mark::Done);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}
