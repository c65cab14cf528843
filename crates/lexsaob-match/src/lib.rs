//! Matching engine for reconciling Wikidata lexemes with the SAOB word list.
//!
//! Three layers, leaves first:
//! - [`normalize`]: maps SAOB's free-text category tokens onto the canonical
//!   categories via an ordered rule table.
//! - [`disambig`]: decides no match / unique match / ambiguous-skip for one
//!   lexeme and its same-lemma candidates, applying the multiplicity guard.
//! - [`reconcile`]: the sequential driver that runs every lexeme through the
//!   index and disambiguator, calls the write-back collaborator, and
//!   aggregates a [`ReconciliationReport`].
//!
//! The crate owns no I/O. Fetching, the snapshot file, and the knowledge-base
//! edits live behind the [`SourceCatalogFetcher`], [`WriteBackClient`], and
//! [`SubentryLocator`] traits so the whole engine runs deterministically
//! against in-memory fixtures.

pub mod disambig;
pub mod normalize;
pub mod reconcile;

pub use disambig::{AutoDecline, CategoryResolutionHook, MatchOutcome, RejectReason, resolve};
pub use normalize::{Normalized, normalize};
pub use reconcile::{
    DEFAULT_COVERED_INITIALS, FetchError, LocateError, Reconciler, ReconcilerConfig,
    ReconciliationReport, RecordOutcome, SourceCatalogFetcher, SubentryLocator, WriteBackClient,
    WriteBackError,
};
