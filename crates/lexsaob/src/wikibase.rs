//! Write matched identifiers back to Wikidata via the action API.
//!
//! Claim JSON builders are pure functions so the exact statement shapes stay
//! unit-testable without a network. [`WikibaseClient`] fetches a CSRF token
//! once and POSTs `wbeditentity` edits; [`DryRunWriter`] logs the intended
//! edits and performs none of them.

use chrono::{NaiveDate, Utc};
use reqwest::blocking::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

use lexsaob_match::{WriteBackClient, WriteBackError};
use lexsaob_types::{Lexeme, SaobEntry, SaobSubentry};

/// SAOB main entry identifier (external-id).
pub const P_SAOB: &str = "P8478";
/// SAOB section identifier for subentries (external-id).
pub const P_SAOB_SECTION: &str = "P9963";
/// "checked against this source without finding the value" marker (item).
pub const P_CHECKED: &str = "P9660";
/// Stated in (item).
pub const P_STATED_IN: &str = "P1343";
/// Point in time (time qualifier).
pub const P_POINT_IN_TIME: &str = "P585";
/// The SAOB dictionary item.
pub const Q_SAOB: &str = "Q1935308";

const API_URL: &str = "https://www.wikidata.org/w/api.php";
const EDIT_SUMMARY: &str = "Added SAOB identifier with lexsaob";
const GREGORIAN_CALENDAR: &str = "http://www.wikidata.org/entity/Q1985727";
const USER_AGENT: &str = concat!("lexsaob/", env!("CARGO_PKG_VERSION"));

/// An external-id statement `property = value`.
pub fn external_id_claim(property: &str, value: &str) -> Value {
    json!({
        "mainsnak": {
            "snaktype": "value",
            "property": property,
            "datavalue": {"value": value, "type": "string"}
        },
        "type": "statement",
        "rank": "normal"
    })
}

/// A no-value snak for `property`.
pub fn no_value_claim(property: &str) -> Value {
    json!({
        "mainsnak": {"snaktype": "novalue", "property": property},
        "type": "statement",
        "rank": "normal"
    })
}

/// An item statement `property = item`.
pub fn item_claim(property: &str, item: &str) -> Value {
    json!({
        "mainsnak": {
            "snaktype": "value",
            "property": property,
            "datavalue": {
                "value": {"entity-type": "item", "id": item},
                "type": "wikibase-entityid"
            }
        },
        "type": "statement",
        "rank": "normal"
    })
}

/// An item statement qualified with point-in-time = `date` (day precision).
pub fn item_claim_with_point_in_time(property: &str, item: &str, date: NaiveDate) -> Value {
    let mut claim = item_claim(property, item);
    claim["qualifiers"] = json!({
        P_POINT_IN_TIME: [{
            "snaktype": "value",
            "property": P_POINT_IN_TIME,
            "datavalue": {
                "value": {
                    "time": format!("+{}T00:00:00Z", date.format("%Y-%m-%d")),
                    "timezone": 0,
                    "before": 0,
                    "after": 0,
                    "precision": 11,
                    "calendarmodel": GREGORIAN_CALENDAR
                },
                "type": "time"
            }
        }]
    });
    claim
}

fn claims(claims: Vec<Value>) -> Value {
    json!({ "claims": claims })
}

/// Writes edits through the MediaWiki action API.
pub struct WikibaseClient {
    client: Client,
    api_url: String,
    bearer_token: Option<String>,
    csrf_token: Option<String>,
}

impl WikibaseClient {
    /// `bearer_token` is an optional OAuth token; acquiring it is the
    /// caller's business.
    pub fn new(bearer_token: Option<String>) -> Result<Self, WriteBackError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| WriteBackError::Http(e.to_string()))?;
        Ok(Self {
            client,
            api_url: API_URL.to_string(),
            bearer_token,
            csrf_token: None,
        })
    }

    fn csrf_token(&mut self) -> Result<String, WriteBackError> {
        if let Some(token) = &self.csrf_token {
            return Ok(token.clone());
        }
        let mut request = self.client.get(&self.api_url).query(&[
            ("action", "query"),
            ("meta", "tokens"),
            ("type", "csrf"),
            ("format", "json"),
        ]);
        if let Some(bearer) = &self.bearer_token {
            request = request.bearer_auth(bearer);
        }
        let body: Value = request
            .send()
            .map_err(|e| WriteBackError::Http(e.to_string()))?
            .json()
            .map_err(|e| WriteBackError::Http(e.to_string()))?;
        let token = body["query"]["tokens"]["csrftoken"]
            .as_str()
            .ok_or_else(|| WriteBackError::Api("no csrf token in response".to_string()))?
            .to_string();
        self.csrf_token = Some(token.clone());
        Ok(token)
    }

    fn edit(&mut self, lexeme_id: &str, data: Value, summary: &str) -> Result<(), WriteBackError> {
        let token = self.csrf_token()?;
        let data = serde_json::to_string(&data).expect("claim json serializes");
        let mut request = self.client.post(&self.api_url).form(&[
            ("action", "wbeditentity"),
            ("id", lexeme_id),
            ("data", data.as_str()),
            ("summary", summary),
            ("token", token.as_str()),
            ("format", "json"),
        ]);
        if let Some(bearer) = &self.bearer_token {
            request = request.bearer_auth(bearer);
        }
        let body: Value = request
            .send()
            .map_err(|e| WriteBackError::Http(e.to_string()))?
            .json()
            .map_err(|e| WriteBackError::Http(e.to_string()))?;
        if let Some(error) = body.get("error") {
            let info = error["info"].as_str().unwrap_or("unknown api error");
            return Err(WriteBackError::Api(info.to_string()));
        }
        debug!("edited {lexeme_id}: {summary}");
        Ok(())
    }
}

impl WriteBackClient for WikibaseClient {
    fn apply_identifier(
        &mut self,
        lexeme: &Lexeme,
        entry: &SaobEntry,
    ) -> Result<(), WriteBackError> {
        info!("uploading {} to {}: {}", entry.id, lexeme.id, lexeme.lemma);
        let data = claims(vec![
            external_id_claim(P_SAOB, &entry.id),
            item_claim(P_STATED_IN, Q_SAOB),
        ]);
        self.edit(&lexeme.id, data, EDIT_SUMMARY)
    }

    fn apply_no_value(&mut self, lexeme: &Lexeme) -> Result<(), WriteBackError> {
        info!("uploading no-value statement to {}: {}", lexeme.id, lexeme.lemma);
        let data = claims(vec![no_value_claim(P_SAOB)]);
        self.edit(&lexeme.id, data, EDIT_SUMMARY)
    }

    fn apply_subentry(
        &mut self,
        lexeme: &Lexeme,
        subentry: &SaobSubentry,
    ) -> Result<(), WriteBackError> {
        info!(
            "uploading subentry {} to {}: {}",
            subentry.identifier(),
            lexeme.id,
            lexeme.lemma
        );
        let data = claims(vec![external_id_claim(P_SAOB_SECTION, &subentry.identifier())]);
        self.edit(&lexeme.id, data, EDIT_SUMMARY)
    }

    fn mark_subentry_checked(&mut self, lexeme: &Lexeme) -> Result<(), WriteBackError> {
        info!("marking {} as checked without a subentry match", lexeme.id);
        let data = claims(vec![item_claim_with_point_in_time(
            P_CHECKED,
            Q_SAOB,
            Utc::now().date_naive(),
        )]);
        self.edit(&lexeme.id, data, EDIT_SUMMARY)
    }
}

/// Logs every intended edit without performing it.
pub struct DryRunWriter;

impl WriteBackClient for DryRunWriter {
    fn apply_identifier(
        &mut self,
        lexeme: &Lexeme,
        entry: &SaobEntry,
    ) -> Result<(), WriteBackError> {
        info!(
            "dry run: would add {P_SAOB}={} to {} ({})",
            entry.id, lexeme.id, lexeme.lemma
        );
        Ok(())
    }

    fn apply_no_value(&mut self, lexeme: &Lexeme) -> Result<(), WriteBackError> {
        info!(
            "dry run: would add {P_SAOB}=no-value to {} ({})",
            lexeme.id, lexeme.lemma
        );
        Ok(())
    }

    fn apply_subentry(
        &mut self,
        lexeme: &Lexeme,
        subentry: &SaobSubentry,
    ) -> Result<(), WriteBackError> {
        info!(
            "dry run: would add {P_SAOB_SECTION}={} to {} ({})",
            subentry.identifier(),
            lexeme.id,
            lexeme.lemma
        );
        Ok(())
    }

    fn mark_subentry_checked(&mut self, lexeme: &Lexeme) -> Result<(), WriteBackError> {
        info!(
            "dry run: would mark {} ({}) as checked",
            lexeme.id, lexeme.lemma
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_id_claim_shape() {
        let claim = external_id_claim(P_SAOB, "O_0283-0242.Qqdq");
        assert_eq!(claim["mainsnak"]["snaktype"], "value");
        assert_eq!(claim["mainsnak"]["property"], "P8478");
        assert_eq!(claim["mainsnak"]["datavalue"]["value"], "O_0283-0242.Qqdq");
        assert_eq!(claim["mainsnak"]["datavalue"]["type"], "string");
        assert_eq!(claim["type"], "statement");
    }

    #[test]
    fn no_value_claim_shape() {
        let claim = no_value_claim(P_SAOB);
        assert_eq!(claim["mainsnak"]["snaktype"], "novalue");
        assert_eq!(claim["mainsnak"]["property"], "P8478");
        assert!(claim["mainsnak"].get("datavalue").is_none());
    }

    #[test]
    fn item_claim_shape() {
        let claim = item_claim(P_STATED_IN, Q_SAOB);
        assert_eq!(claim["mainsnak"]["datavalue"]["type"], "wikibase-entityid");
        assert_eq!(claim["mainsnak"]["datavalue"]["value"]["id"], "Q1935308");
    }

    #[test]
    fn point_in_time_qualifier_has_day_precision() {
        let date = NaiveDate::from_ymd_opt(2021, 8, 13).unwrap();
        let claim = item_claim_with_point_in_time(P_CHECKED, Q_SAOB, date);
        let qualifier = &claim["qualifiers"][P_POINT_IN_TIME][0];
        assert_eq!(qualifier["property"], "P585");
        assert_eq!(
            qualifier["datavalue"]["value"]["time"],
            "+2021-08-13T00:00:00Z"
        );
        assert_eq!(qualifier["datavalue"]["value"]["precision"], 11);
    }
}
