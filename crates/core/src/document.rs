//! Immutable DTE document snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the DTE document view.
///
/// A read-only snapshot; nothing in this system ever mutates it. Monetary
/// columns arrive pre-rendered as display strings from the view; range
/// filtering uses the separate numeric total column, which is not part of
/// this snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DteDocument {
    /// Processing timestamp, absolute instant.
    pub processed_at: Option<DateTime<Utc>>,
    /// Store identifier.
    pub store: Option<String>,
    /// Transaction identifier.
    pub transaction_ref: Option<String>,
    /// Receptor document number.
    pub receptor_document: Option<String>,
    /// Receptor name.
    pub receptor_name: Option<String>,
    /// Net amount, display string.
    pub net: Option<String>,
    /// Tax amount, display string.
    pub tax: Option<String>,
    /// Total amount, display string.
    pub total: Option<String>,
    /// Document-type code.
    pub document_type: Option<String>,
    /// Document status.
    pub status: Option<String>,
    /// Observations.
    pub observations: Option<String>,
    /// Generation code.
    pub generation_code: Option<String>,
    /// Control number.
    pub control_number: Option<String>,
    /// Receipt seal.
    pub receipt_seal: Option<String>,
}
