use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::changes::ChangeSet;
use crate::product::ProductRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Wall-clock time the document was assembled.
    #[serde(rename = "last_updated")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "total_productos")]
    pub total_products: usize,
}

/// The versioned feed published for the web front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationDocument {
    pub metadata: DocumentMetadata,
    /// `null` on the first run and whenever nothing changed.
    pub changes: Option<ChangeSet>,
    pub products: Vec<ProductRecord>,
}
