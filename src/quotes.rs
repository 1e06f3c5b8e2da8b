//! In-memory quote store.
//!
//! Holds quotes a client explicitly asked to keep, keyed by a generated
//! id. In-process only; a restart clears the store.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::AnalysisResult;
use crate::pricing::models::QuoteResult;

/// A quote kept for later retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredQuote {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub filename: Option<String>,
    pub analysis: AnalysisResult,
    pub pricing: QuoteResult,
}

#[derive(Debug, Default)]
pub struct QuoteStore {
    quotes: DashMap<Uuid, StoredQuote>,
}

impl QuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a quote and return its generated id.
    pub fn insert(
        &self,
        filename: Option<String>,
        analysis: AnalysisResult,
        pricing: QuoteResult,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let stored = StoredQuote {
            id,
            created_at: Utc::now(),
            filename,
            analysis,
            pricing,
        };
        self.quotes.insert(id, stored);
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<StoredQuote> {
        self.quotes.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
