//! Fetch lexemes from the Wikidata Query Service.
//!
//! One SPARQL select per page, 10 000 bindings at a time, until a short page
//! arrives. The query pre-filters to lexemes of the configured language that
//! carry neither a SAOB identifier statement nor a truthy no-value one, so
//! the driver never has to re-check that.

use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

use lexsaob_match::{FetchError, SourceCatalogFetcher};
use lexsaob_types::{LexicalCategory, Lexeme};

const WDQS_ENDPOINT: &str = "https://query.wikidata.org/sparql";
const WD_ENTITY_PREFIX: &str = "http://www.wikidata.org/entity/";
const PAGE_SIZE: usize = 10_000;
const USER_AGENT: &str = concat!("lexsaob/", env!("CARGO_PKG_VERSION"));

/// Map a Wikimedia language code to the language item QID.
pub fn language_qid(code: &str) -> Option<&'static str> {
    match code {
        "sv" => Some("Q9027"),
        "da" => Some("Q9035"),
        "nb" => Some("Q25167"),
        "en" => Some("Q1860"),
        "de" => Some("Q188"),
        "fr" => Some("Q150"),
        _ => None,
    }
}

pub struct WdqsFetcher {
    client: Client,
    endpoint: String,
    language_qid: String,
}

impl WdqsFetcher {
    pub fn new(language_qid: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: WDQS_ENDPOINT.to_string(),
            language_qid: language_qid.to_string(),
        })
    }

    fn page_query(&self, offset: usize) -> String {
        format!(
            "SELECT ?lexemeId ?lemma ?category WHERE {{\n\
             ?lexemeId dct:language wd:{qid};\n\
             wikibase:lemma ?lemma;\n\
             wikibase:lexicalCategory ?category.\n\
             MINUS {{ ?lexemeId wdt:P8478 []. }}\n\
             MINUS {{ ?lexemeId a wdno:P8478. }}\n\
             }} LIMIT {limit} OFFSET {offset}",
            qid = self.language_qid,
            limit = PAGE_SIZE,
        )
    }

    fn fetch_page(&self, offset: usize) -> Result<Vec<Binding>, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", self.page_query(offset).as_str()), ("format", "json")])
            .send()
            .map_err(|e| FetchError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(FetchError::Http(format!(
                "query service returned status {}",
                response.status()
            )));
        }
        let body: SparqlResponse = response
            .json()
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(body.results.bindings)
    }
}

impl SourceCatalogFetcher for WdqsFetcher {
    fn fetch(&self) -> Result<Vec<Lexeme>, FetchError> {
        let mut lexemes = Vec::new();
        let mut offset = 0;
        loop {
            info!("fetching lexemes from WDQS (offset {offset})");
            let bindings = self.fetch_page(offset)?;
            let page_len = bindings.len();
            lexemes.extend(bindings.into_iter().filter_map(lexeme_from_binding));
            if page_len < PAGE_SIZE {
                break;
            }
            offset += PAGE_SIZE;
        }
        info!("fetched {} lexemes without a SAOB identifier", lexemes.len());
        Ok(lexemes)
    }
}

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<Binding>,
}

#[derive(Debug, Deserialize)]
struct Binding {
    #[serde(rename = "lexemeId")]
    lexeme_id: SparqlValue,
    lemma: SparqlValue,
    category: SparqlValue,
}

#[derive(Debug, Deserialize)]
struct SparqlValue {
    value: String,
}

fn lexeme_from_binding(binding: Binding) -> Option<Lexeme> {
    let id = binding
        .lexeme_id
        .value
        .strip_prefix(WD_ENTITY_PREFIX)
        .unwrap_or(&binding.lexeme_id.value)
        .to_string();
    if !is_lexeme_id(&id) {
        warn!("skipping binding with unexpected entity id {id:?}");
        return None;
    }
    let category_qid = binding
        .category
        .value
        .strip_prefix(WD_ENTITY_PREFIX)
        .unwrap_or(&binding.category.value);
    Some(Lexeme {
        id,
        lemma: binding.lemma.value,
        category: LexicalCategory::from_qid(category_qid),
    })
}

fn is_lexeme_id(id: &str) -> bool {
    match id.strip_prefix('L') {
        Some(rest) => !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(id: &str, lemma: &str, category: &str) -> Binding {
        Binding {
            lexeme_id: SparqlValue {
                value: id.to_string(),
            },
            lemma: SparqlValue {
                value: lemma.to_string(),
            },
            category: SparqlValue {
                value: category.to_string(),
            },
        }
    }

    #[test]
    fn strips_entity_prefixes_and_maps_categories() {
        let lexeme = lexeme_from_binding(binding(
            "http://www.wikidata.org/entity/L33",
            "hund",
            "http://www.wikidata.org/entity/Q1084",
        ))
        .expect("well-formed binding");
        assert_eq!(lexeme.id, "L33");
        assert_eq!(lexeme.lemma, "hund");
        assert_eq!(lexeme.category, Some(LexicalCategory::Noun));
    }

    #[test]
    fn category_outside_the_closed_set_becomes_none() {
        let lexeme = lexeme_from_binding(binding(
            "http://www.wikidata.org/entity/L34",
            "över",
            "http://www.wikidata.org/entity/Q147276",
        ))
        .expect("well-formed binding");
        assert_eq!(lexeme.category, None);
    }

    #[test]
    fn non_lexeme_ids_are_skipped() {
        assert!(lexeme_from_binding(binding(
            "http://www.wikidata.org/entity/Q42",
            "svar",
            "http://www.wikidata.org/entity/Q1084",
        ))
        .is_none());
        assert!(!is_lexeme_id("L"));
        assert!(!is_lexeme_id("L12x"));
        assert!(is_lexeme_id("L12345"));
    }

    #[test]
    fn response_json_deserializes() {
        let raw = r#"{
            "results": {
                "bindings": [
                    {
                        "lexemeId": {"type": "uri", "value": "http://www.wikidata.org/entity/L47"},
                        "lemma": {"xml:lang": "sv", "type": "literal", "value": "springa"},
                        "category": {"type": "uri", "value": "http://www.wikidata.org/entity/Q24905"}
                    }
                ]
            }
        }"#;
        let response: SparqlResponse = serde_json::from_str(raw).expect("decode");
        assert_eq!(response.results.bindings.len(), 1);
        let lexeme = lexeme_from_binding(response.results.bindings.into_iter().next().unwrap())
            .expect("lexeme");
        assert_eq!(lexeme.id, "L47");
        assert_eq!(lexeme.category, Some(LexicalCategory::Verb));
    }

    #[test]
    fn page_query_filters_on_language_and_identifier() {
        let fetcher = WdqsFetcher::new("Q9027").unwrap();
        let query = fetcher.page_query(20_000);
        assert!(query.contains("wd:Q9027"));
        assert!(query.contains("wdt:P8478"));
        assert!(query.contains("wdno:P8478"));
        assert!(query.contains("OFFSET 20000"));
    }
}
