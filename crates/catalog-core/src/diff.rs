//! Change detection between the current snapshot and the archived baseline.
//!
//! New keys are classified as a brand-new product or a new unit of an
//! existing code; shared keys are compared on price with a fixed epsilon.
//! Removed keys are deliberately not reported.

use std::path::PathBuf;

use catalog_model::{
    ChangeKind, ChangeSet, NewItem, PRICE_EPSILON, PriceChange, PriceDirection, ProductRecord,
    Snapshot,
};
use tracing::{debug, warn};

use crate::error::Result;

/// Finds archived source files to compare against.
pub trait ArchiveLookup {
    /// The most recently modified archived file whose name is not `file_name`.
    fn latest_excluding(&self, file_name: &str) -> Result<Option<PathBuf>>;
}

/// Supplies the prior snapshot for a run.
pub trait BaselineSource {
    /// Load the baseline for a run triggered by `current_file_name`.
    ///
    /// `Ok(None)` means there is nothing to compare against yet.
    fn load_baseline(&self, current_file_name: &str) -> Result<Option<Snapshot>>;
}

/// Diff `current` against whatever baseline `baseline` provides.
///
/// Returns `None` on a first run, when the baseline cannot be read, or when
/// nothing changed. A broken baseline only costs the change feed for this
/// run; publication still goes ahead.
pub fn detect(current: &Snapshot, baseline: &impl BaselineSource) -> Option<ChangeSet> {
    let prior = match baseline.load_baseline(&current.source.file_name) {
        Ok(Some(prior)) => prior,
        Ok(None) => {
            debug!(source = %current.source.file_name, "no baseline snapshot, skipping diff");
            return None;
        }
        Err(error) => {
            warn!(%error, "baseline snapshot unreadable, publishing without changes");
            return None;
        }
    };
    debug!(baseline = %prior.source.file_name, "comparing against baseline");
    diff_snapshots(current, &prior)
}

/// Compare two snapshots by composite key.
///
/// Entries come out in the current snapshot's order.
#[must_use]
pub fn diff_snapshots(current: &Snapshot, prior: &Snapshot) -> Option<ChangeSet> {
    let current_index = current.index();
    let prior_index = prior.index();
    let mut changes = ChangeSet::default();

    for (key, record) in current_index.iter() {
        match prior_index.get(key) {
            None => {
                let is_new_product = !prior_index.contains_code(&key.code);
                changes.new_items.push(NewItem {
                    code: record.code.clone(),
                    description: record.description.clone(),
                    price: record.price.clone(),
                    unit: record.unit.clone(),
                    is_new_product,
                    kind: ChangeKind::from_is_new_product(is_new_product),
                });
            }
            Some(old) => {
                if let Some(change) = price_change(old, record) {
                    changes.price_changes.push(change);
                }
            }
        }
    }

    debug!(
        new_items = changes.new_items.len(),
        price_changes = changes.price_changes.len(),
        "diff complete"
    );
    changes.non_empty()
}

/// A price entry when both prices parse and differ by more than the epsilon.
///
/// Unparseable prices are skipped without reporting.
fn price_change(old: &ProductRecord, new: &ProductRecord) -> Option<PriceChange> {
    let (Some(before), Some(after)) = (old.parsed_price(), new.parsed_price()) else {
        tracing::trace!(key = %new.key(), "price not numeric, skipping comparison");
        return None;
    };
    if (after - before).abs() <= PRICE_EPSILON {
        return None;
    }
    Some(PriceChange {
        code: new.code.clone(),
        description: new.description.clone(),
        price_old: old.price.clone(),
        price_new: new.price.clone(),
        unit: new.unit.clone(),
        direction: PriceDirection::between(before, after),
    })
}
