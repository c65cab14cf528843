//! Look up compounds as subentries on saob.se.
//!
//! Compounds are listed under their head word: "handduk" lives on the entry
//! "hand" at section "-duk". The site's autocomplete endpoint returns, for a
//! search term, suggestion objects with a `label` and a `link`; a label that
//! equals the lemma once its dashes are removed is a hit, and the link's
//! `seek` parameter plus URL fragment locate the subentry section.

use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use lexsaob_match::{LocateError, SubentryLocator};
use lexsaob_types::SaobSubentry;

const AUTOCOMPLETE_URL: &str = "https://www.saob.se/wp-admin/admin-ajax.php";
const USER_AGENT: &str = concat!("lexsaob/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct Suggestion {
    label: String,
    link: String,
}

pub struct SaobSeLocator {
    client: Client,
}

impl SaobSeLocator {
    pub fn new() -> Result<Self, LocateError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LocateError::Http(e.to_string()))?;
        Ok(Self { client })
    }
}

impl SubentryLocator for SaobSeLocator {
    fn find(&self, lemma: &str) -> Result<Option<SaobSubentry>, LocateError> {
        let response = self
            .client
            .get(AUTOCOMPLETE_URL)
            .query(&[("action", "myprefix_autocompletesearch"), ("term", lemma)])
            .header("Accept", "application/json")
            .send()
            .map_err(|e| LocateError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(LocateError::Status(response.status().as_u16()));
        }
        let body = response.text().map_err(|e| LocateError::Http(e.to_string()))?;
        let suggestions = parse_suggestions(&body)?;
        Ok(match_suggestion(lemma, &suggestions))
    }
}

/// The endpoint wraps its JSON array in parentheses; strip them first.
fn parse_suggestions(body: &str) -> Result<Vec<Suggestion>, LocateError> {
    let trimmed = body
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')');
    serde_json::from_str(trimmed).map_err(|e| LocateError::Malformed(e.to_string()))
}

fn match_suggestion(lemma: &str, suggestions: &[Suggestion]) -> Option<SaobSubentry> {
    for suggestion in suggestions {
        if suggestion.label.replace('-', "") == lemma {
            if let Some(subentry) = subentry_from_link(lemma, &suggestion.link) {
                return Some(subentry);
            }
        } else {
            debug!("skipped suggestion {:?}", suggestion.label);
        }
    }
    None
}

/// A usable link carries a `seek` parameter and a fragment starting with an
/// ASCII uppercase letter.
fn subentry_from_link(lemma: &str, link: &str) -> Option<SaobSubentry> {
    let url = Url::parse(link).ok()?;
    let seek = url
        .query_pairs()
        .find(|(key, _)| key == "seek")
        .map(|(_, value)| value.into_owned())?;
    let fragment = url.fragment()?;
    if !fragment.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        return None;
    }
    Some(SaobSubentry {
        lemma: lemma.to_string(),
        seek,
        section_id: fragment.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_parenthesized_suggestion_list() {
        let body = r#"([{"label":"hand-duk","link":"https://www.saob.se/artikel/?seek=handduk&pz=1#H1234"},{"label":"handla","link":"https://www.saob.se/artikel/?seek=handla&pz=1"}])"#;
        let suggestions = parse_suggestions(body).expect("parse");
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].label, "hand-duk");
    }

    #[test]
    fn dashed_label_matches_the_plain_lemma() {
        let suggestions = parse_suggestions(
            r#"([{"label":"hand-duk","link":"https://www.saob.se/artikel/?seek=handduk&pz=1#H1234"}])"#,
        )
        .unwrap();
        let subentry = match_suggestion("handduk", &suggestions).expect("match");
        assert_eq!(subentry.lemma, "handduk");
        assert_eq!(subentry.seek, "handduk");
        assert_eq!(subentry.section_id, "H1234");
        assert_eq!(subentry.identifier(), "handduk#H1234");
    }

    #[test]
    fn unrelated_labels_do_not_match() {
        let suggestions = parse_suggestions(
            r#"([{"label":"handla","link":"https://www.saob.se/artikel/?seek=handla&pz=1#H9"}])"#,
        )
        .unwrap();
        assert!(match_suggestion("handduk", &suggestions).is_none());
    }

    #[test]
    fn link_needs_seek_and_an_uppercase_fragment() {
        assert!(subentry_from_link("x", "https://www.saob.se/artikel/?pz=1#H1").is_none());
        assert!(
            subentry_from_link("x", "https://www.saob.se/artikel/?seek=x&pz=1#h1").is_none()
        );
        assert!(subentry_from_link("x", "https://www.saob.se/artikel/?seek=x&pz=1").is_none());
        assert!(subentry_from_link("x", "not a url").is_none());
        assert!(subentry_from_link("x", "https://www.saob.se/artikel/?seek=x&pz=1#X1").is_some());
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(matches!(
            parse_suggestions("(not json)"),
            Err(LocateError::Malformed(_))
        ));
    }
}
