use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::aggregate::{CorpusMetrics, corpus_metrics, sort_reports};
use crate::config::EstimationConfig;
use crate::error::Result;
use crate::report::{NormalizedReport, assemble_report, resolve_generated_at};
use crate::schema::{BackendReview, parse_review};
use crate::store::DocumentStore;

/// Why a document was left out of the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Unreadable(String),
    Malformed(String),
}

/// Per-document processing outcome. One bad document becomes a `Skipped`
/// entry; it never aborts the rest of the batch.
#[derive(Debug)]
pub enum DocumentOutcome {
    Parsed(ParsedDocument),
    Skipped { filename: String, reason: SkipReason },
}

#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub filename: String,
    pub review: BackendReview,
}

/// The transformation/aggregation core behind the reports and metrics
/// boundary. Stateless: every call re-reads and re-derives from the store.
pub struct ReviewService<S> {
    store: S,
    estimation: EstimationConfig,
}

impl<S: DocumentStore> ReviewService<S> {
    pub fn new(store: S, estimation: EstimationConfig) -> Self {
        Self { store, estimation }
    }

    /// Read and parse every listed document. Store unavailability is an
    /// empty corpus; per-document read and parse failures are recorded as
    /// skips and logged.
    pub fn load_corpus(&self) -> Vec<DocumentOutcome> {
        let names = match self.store.list() {
            Ok(names) => names,
            Err(e) => {
                warn!(error = %e, "document store unavailable, treating as empty corpus");
                return Vec::new();
            }
        };

        let mut outcomes = Vec::with_capacity(names.len());
        for filename in names {
            let outcome = match self.store.read(&filename) {
                Ok(raw) => match parse_review(&raw) {
                    Ok(review) => DocumentOutcome::Parsed(ParsedDocument { filename, review }),
                    Err(e) => {
                        warn!(filename = %filename, error = %e, "skipping malformed document");
                        DocumentOutcome::Skipped {
                            filename,
                            reason: SkipReason::Malformed(e.to_string()),
                        }
                    }
                },
                Err(e) => {
                    warn!(filename = %filename, error = %e, "skipping unreadable document");
                    DocumentOutcome::Skipped {
                        filename,
                        reason: SkipReason::Unreadable(e.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    /// The "list reports" operation: one normalized report per usable
    /// document, most recently generated first. Empty corpus yields an
    /// empty list, never an error.
    pub fn list_reports(&self, now: DateTime<Utc>) -> Result<Vec<NormalizedReport>> {
        let parsed = self.parsed_documents();
        info!(count = parsed.len(), "assembling reports");

        let reports = parsed
            .into_iter()
            .map(|doc| {
                let instant = resolve_generated_at(&doc.review).unwrap_or(DateTime::UNIX_EPOCH);
                (assemble_report(&doc.review, &doc.filename, now), instant)
            })
            .collect();
        Ok(sort_reports(reports))
    }

    /// The "corpus metrics" operation. `None` is the "no data" sentinel
    /// for an empty or fully-unusable corpus.
    pub fn corpus_metrics(&self) -> Result<Option<CorpusMetrics>> {
        let parsed = self.parsed_documents();
        let reviews: Vec<&BackendReview> = parsed.iter().map(|doc| &doc.review).collect();
        Ok(corpus_metrics(&reviews, &self.estimation))
    }

    fn parsed_documents(&self) -> Vec<ParsedDocument> {
        self.load_corpus()
            .into_iter()
            .filter_map(|outcome| match outcome {
                DocumentOutcome::Parsed(doc) => Some(doc),
                DocumentOutcome::Skipped { .. } => None,
            })
            .collect()
    }
}
