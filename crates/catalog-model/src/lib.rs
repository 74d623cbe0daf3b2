//! Catalog data model shared by the ingest, diff and publication stages.
//!
//! Rust names are English; on the wire every type uses the Spanish field
//! names the static catalog page reads (`codigo`, `precio`, `nuevos`,
//! `precio_antiguo`, `last_updated`, ...).

#![deny(unsafe_code)]

pub mod changes;
pub mod document;
pub mod product;
pub mod snapshot;

pub use changes::{ChangeKind, ChangeSet, NewItem, PRICE_EPSILON, PriceChange, PriceDirection};
pub use document::{DocumentMetadata, PublicationDocument};
pub use product::{ProductKey, ProductRecord};
pub use snapshot::{RecordIndex, Snapshot, SourceInfo};
