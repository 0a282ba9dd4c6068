//! `atlas` command-line front end.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use atlas_cli::{init_observability, load_corpus, AtlasConfig};
use atlas_core::{
    aggregate, canonicalize_isnad, classify, normalize, tokenize, transition,
    validate_path_scores, view, AnalystVerdict, Engine, MatchStrategy, PathScore, Ruling, SearchOptions,
    SessionEvent, SessionState, SessionView,
};
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "atlas",
    about = "Match narration records and score their attestation"
)]
struct Cli {
    /// Path to the config file (JSON); falls back to `ATLAS_CONFIG`
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Corpus file (CSV or JSON); overrides the config
    #[arg(long, global = true, env = "ATLAS_CORPUS")]
    corpus: Option<PathBuf>,

    /// Core match threshold; overrides the config
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Emit structured JSON logs
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the normalized form of a text
    Normalize { text: String },
    /// Print the tokens of a text, one per line
    Tokenize { text: String },
    /// Print the canonical key of a transmission chain
    Canonicalize { isnad: String },
    /// Search the corpus; each line of the query is searched separately
    Search {
        #[arg(long)]
        query: String,
        /// All tokens OR phrase containment instead of core matching
        #[arg(long)]
        loose: bool,
        #[arg(long)]
        source: Vec<String>,
    },
    /// Group a unit into paths and score it
    Analyze {
        #[arg(long)]
        unit: String,
        /// Path score as KEY=VALUE; repeatable
        #[arg(long = "score", value_parser = parse_path_score)]
        scores: Vec<(String, f64)>,
        /// Analyst ruling (name or Arabic label)
        #[arg(long)]
        ruling: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Aggregate raw path scores
    Score { values: Vec<f64> },
}

fn parse_path_score(input: &str) -> Result<(String, f64), String> {
    let (key, value) = input
        .rsplit_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {input:?}"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|err| format!("invalid score {value:?}: {err}"))?;
    Ok((key.trim().to_string(), value))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_observability(cli.log_json);

    match &cli.command {
        Commands::Normalize { text } => println!("{}", normalize(text)),
        Commands::Tokenize { text } => {
            for token in tokenize(text) {
                println!("{token}");
            }
        }
        Commands::Canonicalize { isnad } => match canonicalize_isnad(isnad) {
            Some(key) => println!("{key}"),
            None => bail!("no canonical isnad could be derived"),
        },
        Commands::Score { values } => {
            let scores = values
                .iter()
                .map(|v| PathScore::new(*v))
                .collect::<Result<Vec<_>, _>>()?;
            let assessment = classify(aggregate(&scores).as_ref());
            println!("{}", serde_json::to_string_pretty(&assessment)?);
        }
        Commands::Search {
            query,
            loose,
            source,
        } => {
            let (config, engine) = open_engine(&cli)?;
            let mut options = search_options(&config, *loose);
            options.sources = source.clone();

            let results = engine.search(query, &options);
            if results.is_empty() {
                info!("no results");
            }
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Analyze {
            unit,
            scores,
            ruling,
            notes,
        } => {
            let (config, engine) = open_engine(&cli)?;
            let options = search_options(&config, false);

            let events = analysis_events(unit, scores, ruling.as_deref(), notes)?;

            let state = events
                .into_iter()
                .fold(SessionState::default(), transition);
            let screen = view(&state, &engine, &options);

            match &screen {
                SessionView::MissingUnit { unit_id } => bail!("unknown unit {unit_id}"),
                SessionView::Analysis(analysis) => {
                    for (path, _) in scores {
                        if !analysis.paths.iter().any(|p| &p.key == path) {
                            bail!("unit {unit} has no path {path:?}");
                        }
                    }
                }
                _ => {}
            }
            println!("{}", serde_json::to_string_pretty(&screen)?);
        }
    }

    Ok(())
}

fn open_engine(cli: &Cli) -> anyhow::Result<(AtlasConfig, Engine)> {
    let mut config = match &cli.config {
        Some(path) => AtlasConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AtlasConfig::from_env_or_default().context("loading config from ATLAS_CONFIG")?,
    };
    if let Some(corpus) = &cli.corpus {
        config.corpus_path = Some(corpus.clone());
    }
    if let Some(threshold) = cli.threshold {
        config.matching.threshold = threshold;
    }
    config.validate()?;

    let corpus_path = config
        .corpus_path
        .clone()
        .ok_or_else(|| anyhow!("no corpus configured; pass --corpus or set corpus_path"))?;
    let corpus = load_corpus(&corpus_path)
        .with_context(|| format!("loading corpus {}", corpus_path.display()))?;
    let engine = Engine::new(corpus).with_grouper(config.grouper()?);
    Ok((config, engine))
}

/// Session events for one analysis: open the unit, score each path once,
/// then record the ruling if one was given.
fn analysis_events(
    unit: &str,
    scores: &[(String, f64)],
    ruling: Option<&str>,
    notes: &str,
) -> anyhow::Result<Vec<SessionEvent>> {
    let mut events = vec![
        SessionEvent::OpenUnit {
            unit_id: unit.to_string(),
        },
        SessionEvent::Analyze,
    ];

    let scored = validate_path_scores(scores.iter().map(|(path, value)| (path.as_str(), *value)))
        .context("invalid --score")?;
    events.extend(
        scored
            .into_iter()
            .map(|(path, score)| SessionEvent::ScorePath { path, score }),
    );

    if let Some(ruling) = ruling {
        let ruling = Ruling::parse(ruling).ok_or_else(|| anyhow!("unknown ruling {ruling:?}"))?;
        events.push(SessionEvent::RecordVerdict {
            verdict: AnalystVerdict::new(ruling, notes),
        });
    }
    Ok(events)
}

fn search_options(config: &AtlasConfig, loose: bool) -> SearchOptions {
    let core = config.matching.core_strategy();
    SearchOptions {
        strategy: if loose {
            MatchStrategy::loose()
        } else {
            core.clone()
        },
        sources: Vec::new(),
        unit_strategy: core,
    }
}
