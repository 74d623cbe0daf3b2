//! Publication document assembly.

use catalog_model::{ChangeSet, DocumentMetadata, PublicationDocument, Snapshot};
use chrono::{DateTime, SubsecRound, Utc};

/// Source of the publication timestamp.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock, truncated to whole seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(0)
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Build the document published for `snapshot`.
///
/// Every record is published in source order, duplicates included.
#[must_use]
pub fn assemble(
    snapshot: Snapshot,
    changes: Option<ChangeSet>,
    timestamp: DateTime<Utc>,
) -> PublicationDocument {
    let products = snapshot.records;
    PublicationDocument {
        metadata: DocumentMetadata {
            timestamp,
            total_products: products.len(),
        },
        changes,
        products,
    }
}
