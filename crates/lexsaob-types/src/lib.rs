//! Shared types for matching Wikidata lexemes against the SAOB word list.
//!
//! Both catalogs are reduced to small, immutable value types: [`Lexeme`] for
//! the Wikidata side, [`SaobEntry`] and [`SaobSubentry`] for the dictionary
//! side, and [`LexicalCategory`] as the closed set of part-of-speech codes the
//! matcher understands. Category codes map to and from the Wikidata QIDs used
//! on `wikibase:lexicalCategory`.
//!
//! ```rust
//! use lexsaob_types::LexicalCategory;
//!
//! let noun = LexicalCategory::from_qid("Q1084").unwrap();
//! assert_eq!(noun.qid(), "Q1084");
//! assert_eq!(noun.to_string(), "noun");
//! ```

use std::fmt;

/// Closed set of lexical categories handled by the matcher.
///
/// Lexemes whose category QID falls outside this set carry `None` instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LexicalCategory {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Conjunction,
    Interjection,
    Preposition,
    Numeral,
    Article,
    Pronoun,
    Affix,
}

impl LexicalCategory {
    /// Parse a Wikidata QID into a category, if it is one we track.
    pub fn from_qid(qid: &str) -> Option<Self> {
        match qid {
            "Q1084" => Some(LexicalCategory::Noun),
            "Q24905" => Some(LexicalCategory::Verb),
            "Q34698" => Some(LexicalCategory::Adjective),
            "Q380057" => Some(LexicalCategory::Adverb),
            "Q36484" => Some(LexicalCategory::Conjunction),
            "Q83034" => Some(LexicalCategory::Interjection),
            "Q4833830" => Some(LexicalCategory::Preposition),
            "Q63116" => Some(LexicalCategory::Numeral),
            "Q103184" => Some(LexicalCategory::Article),
            "Q36224" => Some(LexicalCategory::Pronoun),
            "Q62155" => Some(LexicalCategory::Affix),
            _ => None,
        }
    }

    /// The Wikidata QID used on `wikibase:lexicalCategory` statements.
    pub fn qid(self) -> &'static str {
        match self {
            LexicalCategory::Noun => "Q1084",
            LexicalCategory::Verb => "Q24905",
            LexicalCategory::Adjective => "Q34698",
            LexicalCategory::Adverb => "Q380057",
            LexicalCategory::Conjunction => "Q36484",
            LexicalCategory::Interjection => "Q83034",
            LexicalCategory::Preposition => "Q4833830",
            LexicalCategory::Numeral => "Q63116",
            LexicalCategory::Article => "Q103184",
            LexicalCategory::Pronoun => "Q36224",
            LexicalCategory::Affix => "Q62155",
        }
    }
}

impl fmt::Display for LexicalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LexicalCategory::Noun => "noun",
            LexicalCategory::Verb => "verb",
            LexicalCategory::Adjective => "adjective",
            LexicalCategory::Adverb => "adverb",
            LexicalCategory::Conjunction => "conjunction",
            LexicalCategory::Interjection => "interjection",
            LexicalCategory::Preposition => "preposition",
            LexicalCategory::Numeral => "numeral",
            LexicalCategory::Article => "article",
            LexicalCategory::Pronoun => "pronoun",
            LexicalCategory::Affix => "affix",
        })
    }
}

/// A Wikidata lexeme record as fetched from the query service.
///
/// Immutable once constructed; the matcher only reads it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Lexeme {
    /// Entity id of the form `L<digits>`.
    pub id: String,
    /// Written form, non-empty for well-formed records.
    pub lemma: String,
    /// Canonical category, `None` when the lexeme's category QID is outside
    /// the closed set.
    pub category: Option<LexicalCategory>,
}

impl Lexeme {
    /// Entity page URL on Wikidata.
    pub fn url(&self) -> String {
        format!("http://www.wikidata.org/entity/{}", self.id)
    }
}

/// One row of the scraped SAOB word list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaobEntry {
    /// The `id` query parameter of the entry URL, e.g. `O_0283-0242.Qqdq`.
    pub id: String,
    /// Written form, non-empty.
    pub lemma: String,
    /// Free-text category token from the list; may carry punctuation,
    /// parenthetical qualifiers, or compound markers.
    pub raw_category: String,
    /// Homonym/sub-sense number; 0 means the primary or only entry.
    pub number: u32,
}

impl SaobEntry {
    /// Article URL on saob.se.
    pub fn url(&self) -> String {
        format!("https://www.saob.se/artikel/?unik={}", self.id)
    }
}

/// A compound listed as a subentry under a head word on saob.se.
///
/// E.g. "handduk" appears on the entry "hand" under "-duk". The upload
/// identifier is `{lemma}#{section_id}`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaobSubentry {
    /// The compound lemma that was searched for.
    pub lemma: String,
    /// URL-escaped `seek` parameter locating the head word article.
    pub seek: String,
    /// Fragment id of the subentry section within the article.
    pub section_id: String,
}

impl SaobSubentry {
    /// Direct link to the subentry section.
    pub fn url(&self) -> String {
        format!("https://www.saob.se/artikel/?seek={}#{}", self.seek, self.section_id)
    }

    /// Identifier written back to Wikidata.
    pub fn identifier(&self) -> String {
        format!("{}#{}", self.lemma, self.section_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qid_round_trip() {
        for qid in [
            "Q1084", "Q24905", "Q34698", "Q380057", "Q36484", "Q83034", "Q4833830", "Q63116",
            "Q103184", "Q36224", "Q62155",
        ] {
            let category = LexicalCategory::from_qid(qid).expect("known qid");
            assert_eq!(category.qid(), qid);
        }
        assert_eq!(LexicalCategory::from_qid("Q42"), None);
        assert_eq!(LexicalCategory::from_qid(""), None);
    }

    #[test]
    fn urls_and_identifiers() {
        let lexeme = Lexeme {
            id: "L33".into(),
            lemma: "hund".into(),
            category: Some(LexicalCategory::Noun),
        };
        assert_eq!(lexeme.url(), "http://www.wikidata.org/entity/L33");

        let entry = SaobEntry {
            id: "O_0283-0242.Qqdq".into(),
            lemma: "ost".into(),
            raw_category: "subst.".into(),
            number: 0,
        };
        assert_eq!(entry.url(), "https://www.saob.se/artikel/?unik=O_0283-0242.Qqdq");

        let subentry = SaobSubentry {
            lemma: "handduk".into(),
            seek: "hand".into(),
            section_id: "H1234".into(),
        };
        assert_eq!(subentry.identifier(), "handduk#H1234");
        assert_eq!(subentry.url(), "https://www.saob.se/artikel/?seek=hand#H1234");
    }
}
