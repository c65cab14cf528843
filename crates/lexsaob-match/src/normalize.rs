//! Normalize SAOB's free-text category tokens to canonical categories.
//!
//! The word list tags entries with legacy abbreviations ("subst.", "adj.",
//! "v. dep."), parenthetical qualifiers, and compound markers. An ordered
//! rule table of case-sensitive substring probes classifies the observed tag
//! vocabulary without needing a full grammar; the first matching rule wins.

use lexsaob_types::LexicalCategory;

/// Total, four-way classification of a raw category token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Normalized {
    /// A canonical category was recognized.
    Category(LexicalCategory),
    /// Empty token: the list carries no category information for this entry.
    NoInfo,
    /// Parenthetical qualifier or compound-part marker: skipped silently,
    /// distinct from an unrecognized token.
    Ignored,
    /// Token not covered by any rule; callers log and continue.
    Unrecognized,
}

enum Probe {
    Contains(&'static str),
    Equals(&'static str),
}

impl Probe {
    fn matches(&self, raw: &str) -> bool {
        match self {
            Probe::Contains(needle) => raw.contains(needle),
            Probe::Equals(token) => raw == *token,
        }
    }
}

enum Effect {
    Category(LexicalCategory),
    /// "subst" tags both nouns and bound morphemes like "-fil"; a hyphen in
    /// the lemma selects Affix over Noun.
    NounUnlessBoundForm,
    Ignore,
}

/// Rule precedence is load-bearing: "adj" must come before "adv", and the
/// exact affix tokens before the parenthetical catch-all.
const RULES: &[(Probe, Effect)] = &[
    (Probe::Contains("verb"), Effect::Category(LexicalCategory::Verb)),
    (Probe::Contains("subst"), Effect::NounUnlessBoundForm),
    (Probe::Contains("adj"), Effect::Category(LexicalCategory::Adjective)),
    (Probe::Contains("adv"), Effect::Category(LexicalCategory::Adverb)),
    (Probe::Contains("konj"), Effect::Category(LexicalCategory::Conjunction)),
    (Probe::Contains("interj"), Effect::Category(LexicalCategory::Interjection)),
    (Probe::Contains("prep"), Effect::Category(LexicalCategory::Preposition)),
    (Probe::Contains("räkn"), Effect::Category(LexicalCategory::Numeral)),
    (Probe::Contains("artikel"), Effect::Category(LexicalCategory::Article)),
    (Probe::Contains("pron"), Effect::Category(LexicalCategory::Pronoun)),
    (Probe::Equals("prefix"), Effect::Category(LexicalCategory::Affix)),
    (Probe::Equals("suffix"), Effect::Category(LexicalCategory::Affix)),
    (Probe::Equals("affix"), Effect::Category(LexicalCategory::Affix)),
    (Probe::Contains("("), Effect::Ignore),
    (Probe::Contains("ssgled"), Effect::Ignore),
];

/// Classify a raw category token against the rule table.
///
/// The lemma is consulted only for the subst/affix distinction. Normalization
/// is idempotent: the same token always yields the same class.
pub fn normalize(raw_category: &str, lemma: &str) -> Normalized {
    if raw_category.is_empty() {
        return Normalized::NoInfo;
    }
    for (probe, effect) in RULES {
        if probe.matches(raw_category) {
            return match effect {
                Effect::Category(category) => Normalized::Category(*category),
                Effect::NounUnlessBoundForm => {
                    if lemma.contains('-') {
                        Normalized::Category(LexicalCategory::Affix)
                    } else {
                        Normalized::Category(LexicalCategory::Noun)
                    }
                }
                Effect::Ignore => Normalized::Ignored,
            };
        }
    }
    Normalized::Unrecognized
}
