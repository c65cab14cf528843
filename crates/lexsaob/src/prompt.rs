//! Interactive category resolution on stdin.
//!
//! When a lone candidate carries no category information the driver consults
//! its hook; this implementation asks the operator a yes/no question for the
//! four categories worth asking about and declines everything else.

use std::io::{self, BufRead, Write};

use lexsaob_match::CategoryResolutionHook;
use lexsaob_types::{LexicalCategory, Lexeme, SaobEntry};

pub struct InteractivePrompt;

impl CategoryResolutionHook for InteractivePrompt {
    fn resolve(&self, lexeme: &Lexeme, entry: &SaobEntry) -> Option<LexicalCategory> {
        let category = lexeme.category?;
        if !matches!(
            category,
            LexicalCategory::Noun
                | LexicalCategory::Verb
                | LexicalCategory::Adjective
                | LexicalCategory::Adverb
        ) {
            return None;
        }
        let question = format!("Is {} a {}? ({})", entry.lemma, category, entry.url());
        ask_yes_no(&question).then_some(category)
    }
}

fn ask_yes_no(question: &str) -> bool {
    ask_yes_no_from(question, &mut io::stdin().lock())
}

fn ask_yes_no_from(question: &str, input: &mut impl BufRead) -> bool {
    loop {
        print!("{question} [y/n]: ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match input.read_line(&mut answer) {
            // A zero-byte read means stdin is closed; nobody will ever
            // answer, so decline instead of re-asking.
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return true,
            "n" | "no" => return false,
            _ => continue,
        }
    }
}
