//! Decide whether a lexeme and its same-lemma candidates match.
//!
//! A single candidate matches when its normalized category agrees with the
//! lexeme's. With several candidates a multiplicity guard kicks in for the
//! countable categories (noun, verb, adjective): when the list carries more
//! than one entry of the agreeing category, category agreement alone cannot
//! tell them apart, so every such candidate is rejected instead of picking
//! one arbitrarily.

use tracing::{debug, warn};

use lexsaob_types::{LexicalCategory, Lexeme, SaobEntry};

use crate::normalize::{Normalized, normalize};

/// Classified result of resolving one lexeme against its candidates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// No entry shares the lemma.
    NoCandidate,
    /// Exactly one candidate and its category agrees.
    UniqueMatch(SaobEntry),
    /// Candidates that survived the multiplicity guard, in file order. Each
    /// one triggers a downstream write; evaluation does not stop at the
    /// first acceptance.
    AmbiguousAccepted(Vec<SaobEntry>),
    /// A category-agreeing candidate was rejected by the multiplicity guard.
    AmbiguousRejected(RejectReason),
    /// The candidate's category token matched no normalization rule.
    UnrecognizedCategory,
    /// Categories disagree, or the list carries no usable category.
    NoCategoryAgreement,
}

/// Why the multiplicity guard rejected a category-agreeing candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    MultipleNouns,
    /// The exact-token noun tally came out 0 even though a noun candidate
    /// agreed, so the noun count is unreliable. Only produced while
    /// [`exact_noun_tally`](crate::reconcile::ReconcilerConfig::exact_noun_tally)
    /// is enabled.
    UncertainNounCount,
    MultipleVerbs,
    MultipleAdjectives,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RejectReason::MultipleNouns => "more than one noun entry",
            RejectReason::UncertainNounCount => "noun entry count is unreliable",
            RejectReason::MultipleVerbs => "more than one verb entry",
            RejectReason::MultipleAdjectives => "more than one adjective entry",
        })
    }
}

/// Consulted when a lone candidate carries no category information.
///
/// The default [`AutoDecline`] answers `None`; a CLI can plug in an
/// interactive implementation that asks the user instead.
pub trait CategoryResolutionHook {
    fn resolve(&self, lexeme: &Lexeme, entry: &SaobEntry) -> Option<LexicalCategory>;
}

/// Hook that never supplies a category.
pub struct AutoDecline;

impl CategoryResolutionHook for AutoDecline {
    fn resolve(&self, _lexeme: &Lexeme, _entry: &SaobEntry) -> Option<LexicalCategory> {
        None
    }
}

/// Per-category candidate counts feeding the multiplicity guard.
struct Tallies {
    nouns: usize,
    verbs: usize,
    adjectives: usize,
    exact_noun_tally: bool,
}

impl Tallies {
    fn count(candidates: &[&SaobEntry], exact_noun_tally: bool) -> Self {
        let mut tallies = Self {
            nouns: 0,
            verbs: 0,
            adjectives: 0,
            exact_noun_tally,
        };
        for entry in candidates {
            // The noun tally historically compared the whole token against
            // "subst." while nouns are detected by substring, so it can stay
            // 0 for a tag like "subst". Kept as a toggleable rule until the
            // owners decide whether rejecting on a zero count is intended.
            let is_noun = if exact_noun_tally {
                entry.raw_category == "subst."
            } else {
                entry.raw_category.contains("subst")
            };
            if is_noun {
                tallies.nouns += 1;
            }
            if entry.raw_category.contains("verb") {
                tallies.verbs += 1;
            }
            if entry.raw_category.contains("adj") {
                tallies.adjectives += 1;
            }
        }
        tallies
    }

    fn guard(&self, category: LexicalCategory) -> Option<RejectReason> {
        match category {
            LexicalCategory::Noun if self.nouns > 1 => Some(RejectReason::MultipleNouns),
            LexicalCategory::Noun if self.exact_noun_tally && self.nouns == 0 => {
                Some(RejectReason::UncertainNounCount)
            }
            LexicalCategory::Verb if self.verbs > 1 => Some(RejectReason::MultipleVerbs),
            LexicalCategory::Adjective if self.adjectives > 1 => {
                Some(RejectReason::MultipleAdjectives)
            }
            _ => None,
        }
    }
}

/// Resolve one lexeme against its same-lemma candidates.
///
/// Deterministic for a given lexeme and candidate list; candidates are
/// expected in file order as returned by the index.
pub fn resolve(
    lexeme: &Lexeme,
    candidates: &[&SaobEntry],
    exact_noun_tally: bool,
    hook: &dyn CategoryResolutionHook,
) -> MatchOutcome {
    match candidates {
        [] => MatchOutcome::NoCandidate,
        [only] => resolve_single(lexeme, only, hook),
        _ => resolve_multiple(lexeme, candidates, exact_noun_tally),
    }
}

fn resolve_single(
    lexeme: &Lexeme,
    entry: &SaobEntry,
    hook: &dyn CategoryResolutionHook,
) -> MatchOutcome {
    debug!(
        "single candidate for {}: {:?} number {} ({})",
        lexeme.lemma,
        entry.raw_category,
        entry.number,
        entry.url()
    );
    let category = match normalize(&entry.raw_category, &entry.lemma) {
        Normalized::Category(category) => Some(category),
        Normalized::NoInfo => hook.resolve(lexeme, entry),
        Normalized::Ignored => None,
        Normalized::Unrecognized => {
            warn!(
                "unrecognized category {:?} on {} ({}), skipping",
                entry.raw_category,
                entry.lemma,
                entry.url()
            );
            return MatchOutcome::UnrecognizedCategory;
        }
    };
    match category {
        Some(category) if Some(category) == lexeme.category => {
            MatchOutcome::UniqueMatch(entry.clone())
        }
        _ => MatchOutcome::NoCategoryAgreement,
    }
}

fn resolve_multiple(
    lexeme: &Lexeme,
    candidates: &[&SaobEntry],
    exact_noun_tally: bool,
) -> MatchOutcome {
    let tallies = Tallies::count(candidates, exact_noun_tally);
    let mut accepted = Vec::new();
    let mut first_rejection = None;
    let mut saw_disagreement = false;
    let mut saw_unrecognized = false;

    for entry in candidates {
        debug!(
            "candidate for {}: {:?} number {} ({})",
            lexeme.lemma,
            entry.raw_category,
            entry.number,
            entry.url()
        );
        match normalize(&entry.raw_category, &entry.lemma) {
            Normalized::Unrecognized => {
                warn!(
                    "unrecognized category {:?} on {} ({}), skipping",
                    entry.raw_category,
                    entry.lemma,
                    entry.url()
                );
                saw_unrecognized = true;
            }
            Normalized::NoInfo | Normalized::Ignored => {}
            Normalized::Category(category) => {
                if Some(category) != lexeme.category {
                    saw_disagreement = true;
                    continue;
                }
                match tallies.guard(category) {
                    Some(reason) => {
                        debug!("rejecting {} candidate: {reason}", entry.lemma);
                        first_rejection.get_or_insert(reason);
                    }
                    None => accepted.push((*entry).clone()),
                }
            }
        }
    }

    if !accepted.is_empty() {
        MatchOutcome::AmbiguousAccepted(accepted)
    } else if let Some(reason) = first_rejection {
        MatchOutcome::AmbiguousRejected(reason)
    } else if saw_disagreement {
        MatchOutcome::NoCategoryAgreement
    } else if saw_unrecognized {
        MatchOutcome::UnrecognizedCategory
    } else {
        MatchOutcome::NoCategoryAgreement
    }
}
