//! Collaborator implementations and wiring for the `lexsaob` binary.
//!
//! The matching engine lives in `lexsaob-match`; this crate supplies the
//! concrete collaborators: the WDQS lexeme fetcher, the Wikibase write-back
//! client (and its dry-run twin), the saob.se subentry locator, and the
//! interactive category prompt.

pub mod prompt;
pub mod saob_se;
pub mod wdqs;
pub mod wikibase;

pub use prompt::InteractivePrompt;
pub use saob_se::SaobSeLocator;
pub use wdqs::{WdqsFetcher, language_qid};
pub use wikibase::{DryRunWriter, WikibaseClient};
