use std::env;
use std::path::PathBuf;

use anyhow::Context;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use lexsaob::{
    DryRunWriter, InteractivePrompt, SaobSeLocator, WdqsFetcher, WikibaseClient, language_qid,
};
use lexsaob_match::{
    AutoDecline, CategoryResolutionHook, Reconciler, ReconcilerConfig, SourceCatalogFetcher,
    WriteBackClient,
};
use saob_list::{CandidateIndex, read_snapshot};

const DEFAULT_SNAPSHOT: &str = "saob.csv";
const DEFAULT_LANGUAGE: &str = "sv";
const TOKEN_ENV: &str = "WIKIDATA_TOKEN";

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!("using word list snapshot at {}", config.snapshot_path.display());
    info!("language: {}", config.language);
    if config.dry_run {
        info!("dry run: no edits will be made");
    }

    let qid = language_qid(&config.language)
        .with_context(|| format!("unsupported language code {:?}", config.language))?;
    let fetcher = WdqsFetcher::new(qid).context("build query service client")?;
    let lexemes = fetcher
        .fetch()
        .context("fetch lexemes from the query service")?;

    let snapshot = read_snapshot(&config.snapshot_path).with_context(|| {
        format!(
            "read word list snapshot {}",
            config.snapshot_path.display()
        )
    })?;
    let snapshot_rows_skipped = snapshot.skipped_rows;
    let index = CandidateIndex::build(snapshot.entries);
    info!(
        "indexed {} entries under {} lemmas",
        index.entry_count(),
        index.lemma_count()
    );

    let mut writer: Box<dyn WriteBackClient> = if config.dry_run {
        Box::new(DryRunWriter)
    } else {
        let token = env::var(TOKEN_ENV).ok();
        if token.is_none() {
            info!("{TOKEN_ENV} not set, editing anonymously");
        }
        Box::new(WikibaseClient::new(token).context("build write-back client")?)
    };
    let hook: Box<dyn CategoryResolutionHook> = if config.ask_category {
        Box::new(InteractivePrompt)
    } else {
        Box::new(AutoDecline)
    };
    let locator = if config.match_subentry {
        Some(SaobSeLocator::new().context("build saob.se client")?)
    } else {
        None
    };

    let reconciler_config = ReconcilerConfig {
        mark_absent: config.mark_absent,
        match_subentry: config.match_subentry,
        ..ReconcilerConfig::default()
    };
    let mut reconciler = Reconciler::new(reconciler_config, writer.as_mut(), hook.as_ref());
    if let Some(locator) = locator.as_ref() {
        reconciler = reconciler.with_locator(locator);
    }

    let report = reconciler.run(&lexemes, &index);

    info!(
        "done: {} processed, {} matched, {} ambiguous, {} absent, \
         {} unrecognized categories, {} malformed lexemes, {} snapshot rows skipped",
        report.processed,
        report.matched,
        report.skipped_ambiguous,
        report.no_dictionary_entry,
        report.unrecognized_category,
        report.malformed,
        snapshot_rows_skipped
    );
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    snapshot_path: PathBuf,
    language: String,
    mark_absent: bool,
    match_subentry: bool,
    ask_category: bool,
    dry_run: bool,
}

fn load_config() -> Config {
    let mut config = Config {
        snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT),
        language: DEFAULT_LANGUAGE.to_string(),
        mark_absent: false,
        match_subentry: false,
        ask_category: false,
        dry_run: false,
    };
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mark-absent" => config.mark_absent = true,
            "--match-subentry" => config.match_subentry = true,
            "--ask-category" => config.ask_category = true,
            "--dry-run" => config.dry_run = true,
            "--snapshot" => {
                if let Some(path) = args.next() {
                    config.snapshot_path = PathBuf::from(path);
                }
            }
            "--language" => {
                if let Some(code) = args.next() {
                    config.language = code;
                }
            }
            _ => {
                if let Some(path) = arg.strip_prefix("--snapshot=") {
                    config.snapshot_path = PathBuf::from(path);
                } else if let Some(code) = arg.strip_prefix("--language=") {
                    config.language = code.to_string();
                }
            }
        }
    }
    config
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
