//! Analysis catalog: the kinds of analysis a ticket can request, how they
//! depend on each other, and the results they produce.

mod catalog;
mod kind;
mod payload;
mod resolver;

pub use catalog::{Catalog, CatalogEntry, CatalogError};
pub use kind::AnalysisKind;
pub use payload::{payload_for, Gap, TimedWord};
pub use resolver::DependencyResolver;
