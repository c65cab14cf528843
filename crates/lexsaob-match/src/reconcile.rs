//! The reconciliation driver: one sequential pass over all lexemes.
//!
//! For each lexeme the driver looks up same-lemma candidates, delegates the
//! decision to the disambiguator, emits apply/no-value requests to the
//! write-back collaborator, and aggregates a [`ReconciliationReport`]. The
//! pass is single-threaded and never aborted by per-record errors: write-back
//! failures are recorded against the record and processing continues.

use thiserror::Error;
use tracing::{debug, info, warn};

use lexsaob_types::{Lexeme, SaobEntry, SaobSubentry};
use saob_list::CandidateIndex;

use crate::disambig::{CategoryResolutionHook, MatchOutcome, resolve};

const PROGRESS_INTERVAL: usize = 1000;

/// Leading characters the published word list covers (a–u, plus
/// hyphen-initial bound forms).
pub const DEFAULT_COVERED_INITIALS: &str = "abcdefghijklmnopqrstu-";

/// Fetching the source records failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("query request failed: {0}")]
    Http(String),
    #[error("could not decode query response: {0}")]
    Decode(String),
}

/// A write-back call failed. Surfaced, never retried.
#[derive(Debug, Error)]
pub enum WriteBackError {
    #[error("edit request failed: {0}")]
    Http(String),
    #[error("edit rejected: {0}")]
    Api(String),
}

/// The subentry search failed.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("subentry search request failed: {0}")]
    Http(String),
    #[error("subentry search returned status {0}")]
    Status(u16),
    #[error("could not parse subentry search response: {0}")]
    Malformed(String),
}

/// Supplies the lexemes to reconcile, already filtered to those lacking the
/// cross-reference; the driver does not re-check that.
pub trait SourceCatalogFetcher {
    fn fetch(&self) -> Result<Vec<Lexeme>, FetchError>;
}

/// Writes decisions back to the knowledge base.
pub trait WriteBackClient {
    /// Record the dictionary entry id on the lexeme.
    fn apply_identifier(&mut self, lexeme: &Lexeme, entry: &SaobEntry)
    -> Result<(), WriteBackError>;
    /// Record that the dictionary has no entry for the lexeme.
    fn apply_no_value(&mut self, lexeme: &Lexeme) -> Result<(), WriteBackError>;
    /// Record a subentry identifier on the lexeme.
    fn apply_subentry(
        &mut self,
        lexeme: &Lexeme,
        subentry: &SaobSubentry,
    ) -> Result<(), WriteBackError>;
    /// Record that a subentry search was performed and found nothing.
    fn mark_subentry_checked(&mut self, lexeme: &Lexeme) -> Result<(), WriteBackError>;
}

/// Finds a compound listed as a subentry under a head word.
pub trait SubentryLocator {
    fn find(&self, lemma: &str) -> Result<Option<SaobSubentry>, LocateError>;
}

/// Behavior toggles for one reconciliation run.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Write a no-value marker for lemmas the list provably lacks.
    pub mark_absent: bool,
    /// Search saob.se for subentry matches when the main list has none.
    pub match_subentry: bool,
    /// Use the historical exact-token noun tally ("subst." only) in the
    /// multiplicity guard, which also rejects on a zero count. See
    /// [`RejectReason::UncertainNounCount`](crate::disambig::RejectReason).
    pub exact_noun_tally: bool,
    /// Lemmas whose first character is outside this set are never marked
    /// absent or searched for subentries.
    pub covered_initials: String,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            mark_absent: false,
            match_subentry: false,
            exact_noun_tally: true,
            covered_initials: DEFAULT_COVERED_INITIALS.to_string(),
        }
    }
}

impl ReconcilerConfig {
    fn covers(&self, lemma: &str) -> bool {
        lemma
            .chars()
            .next()
            .is_some_and(|first| self.covered_initials.contains(first))
    }
}

/// Outcome and write-back status for one processed lexeme.
#[derive(Debug)]
pub struct RecordOutcome {
    pub lexeme_id: String,
    pub outcome: MatchOutcome,
    /// Message of a failed write-back call, if any.
    pub write_back_failure: Option<String>,
}

/// Aggregated result of a full reconciliation pass.
///
/// `matched + skipped_ambiguous + no_dictionary_entry + unrecognized_category`
/// always equals `processed`; `malformed` counts records dropped before
/// processing and sits outside the partition.
#[derive(Debug, Default)]
pub struct ReconciliationReport {
    pub processed: usize,
    pub matched: usize,
    pub skipped_ambiguous: usize,
    pub no_dictionary_entry: usize,
    pub unrecognized_category: usize,
    pub malformed: usize,
    pub records: Vec<RecordOutcome>,
}

/// Drives the full pass. Collaborators are plain trait objects so tests can
/// substitute recorders.
pub struct Reconciler<'a> {
    config: ReconcilerConfig,
    writer: &'a mut dyn WriteBackClient,
    hook: &'a dyn CategoryResolutionHook,
    locator: Option<&'a dyn SubentryLocator>,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        config: ReconcilerConfig,
        writer: &'a mut dyn WriteBackClient,
        hook: &'a dyn CategoryResolutionHook,
    ) -> Self {
        Self {
            config,
            writer,
            hook,
            locator: None,
        }
    }

    /// Attach a subentry locator; without one the `match_subentry` flag is
    /// inert.
    pub fn with_locator(mut self, locator: &'a dyn SubentryLocator) -> Self {
        self.locator = Some(locator);
        self
    }

    /// Process every lexeme once, in order.
    pub fn run(&mut self, lexemes: &[Lexeme], index: &CandidateIndex) -> ReconciliationReport {
        let total = lexemes.len();
        let mut report = ReconciliationReport::default();

        for lexeme in lexemes {
            if report.processed > 0 && report.processed % PROGRESS_INTERVAL == 0 {
                info!(
                    "processed {} of {} lexemes ({}%)",
                    report.processed,
                    total,
                    report.processed * 100 / total
                );
            }
            if lexeme.lemma.is_empty() {
                warn!("skipping lexeme {} with empty lemma", lexeme.id);
                report.malformed += 1;
                continue;
            }
            debug!(
                "working on {}: {} {:?} ({})",
                lexeme.id,
                lexeme.lemma,
                lexeme.category,
                lexeme.url()
            );

            let candidates = index.lookup(&lexeme.lemma);
            let outcome = resolve(lexeme, &candidates, self.config.exact_noun_tally, self.hook);
            let mut failure = None;
            match &outcome {
                MatchOutcome::UniqueMatch(entry) => {
                    report.matched += 1;
                    failure = self.apply(lexeme, std::slice::from_ref(entry));
                }
                MatchOutcome::AmbiguousAccepted(entries) => {
                    report.matched += 1;
                    failure = self.apply(lexeme, entries);
                }
                MatchOutcome::NoCandidate => {
                    debug!("{} not found in the word list", lexeme.lemma);
                    report.no_dictionary_entry += 1;
                    failure = self.handle_absent(lexeme);
                }
                MatchOutcome::UnrecognizedCategory => {
                    report.unrecognized_category += 1;
                }
                MatchOutcome::AmbiguousRejected(reason) => {
                    debug!("skipping {}: {reason}", lexeme.lemma);
                    report.skipped_ambiguous += 1;
                }
                MatchOutcome::NoCategoryAgreement => {
                    report.skipped_ambiguous += 1;
                }
            }

            report.processed += 1;
            report.records.push(RecordOutcome {
                lexeme_id: lexeme.id.clone(),
                outcome,
                write_back_failure: failure,
            });
        }

        info!(
            "processed {} lexemes: {} matched, {} skipped as ambiguous, \
             {} without a dictionary entry, {} with unrecognized category, \
             {} malformed",
            report.processed,
            report.matched,
            report.skipped_ambiguous,
            report.no_dictionary_entry,
            report.unrecognized_category,
            report.malformed
        );
        report
    }

    fn apply(&mut self, lexeme: &Lexeme, entries: &[SaobEntry]) -> Option<String> {
        let mut failure = None;
        for entry in entries {
            info!(
                "matched {} ({}) to {} ({})",
                lexeme.lemma,
                lexeme.url(),
                entry.id,
                entry.url()
            );
            if let Err(e) = self.writer.apply_identifier(lexeme, entry) {
                warn!("write-back failed for {}: {e}", lexeme.id);
                failure.get_or_insert(e.to_string());
            }
        }
        failure
    }

    fn handle_absent(&mut self, lexeme: &Lexeme) -> Option<String> {
        if !self.config.covers(&lexeme.lemma) {
            debug!(
                "{} starts outside the published range, leaving it alone",
                lexeme.lemma
            );
            return None;
        }
        let mut failure = None;
        if self.config.mark_absent
            && let Err(e) = self.writer.apply_no_value(lexeme)
        {
            warn!("no-value write-back failed for {}: {e}", lexeme.id);
            failure.get_or_insert(e.to_string());
        }
        if self.config.match_subentry
            && let Some(locator) = self.locator
        {
            debug!("searching saob.se for a subentry matching {}", lexeme.lemma);
            match locator.find(&lexeme.lemma) {
                Ok(Some(subentry)) => {
                    info!("found subentry {} for {}", subentry.identifier(), lexeme.id);
                    if let Err(e) = self.writer.apply_subentry(lexeme, &subentry) {
                        warn!("subentry write-back failed for {}: {e}", lexeme.id);
                        failure.get_or_insert(e.to_string());
                    }
                }
                Ok(None) => {
                    debug!("no subentry match for {}", lexeme.lemma);
                    if let Err(e) = self.writer.mark_subentry_checked(lexeme) {
                        warn!("checked-marker write-back failed for {}: {e}", lexeme.id);
                        failure.get_or_insert(e.to_string());
                    }
                }
                Err(e) => {
                    warn!("subentry search failed for {}: {e}", lexeme.lemma);
                    failure.get_or_insert(e.to_string());
                }
            }
        }
        failure
    }
}
