mod records;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use rkyv::ser::{serializers::AllocSerializer, Serializer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use records::{
    read_records, write_json, ExtractedOutput, Failure, ResponseRecord, ScoredOutput,
};
use verdict_protocol::{EvaluationRequest, MatchPolicy, ScoredBatch, ScoredRecord};
use verdict_scorer::{compare, extract_textual_feedback, extract_word_scores, Scorer, ScoringConfig};

#[derive(Parser)]
#[command(author, version, about = "Compiles critique phrases into word-level summary scores")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score summaries from labeled critique phrases
    Score {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Where rejected records are written (defaults to <output>.failures.json)
        #[arg(long, value_name = "FILE")]
        failures: Option<PathBuf>,

        /// Also write the results as an rkyv archive
        #[arg(long, value_name = "FILE")]
        archive: Option<PathBuf>,

        /// JSON scoring config
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Overrides the policy from the config file
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        /// Only process the first N records
        #[arg(long, value_name = "N")]
        max_samples: Option<usize>,
    },
    /// Recover feedback and word scores from raw model responses
    Extract {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    FirstUnclaimed,
    AllOccurrences,
}

impl From<PolicyArg> for MatchPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::FirstUnclaimed => MatchPolicy::FirstUnclaimed,
            PolicyArg::AllOccurrences => MatchPolicy::AllOccurrences,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Score {
            input,
            output,
            failures,
            archive,
            config,
            policy,
            max_samples,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(policy) = policy {
                config = config.with_policy(policy.into());
            }
            let failures = failures.unwrap_or_else(|| output.with_extension("failures.json"));
            score(&input, &output, &failures, archive.as_deref(), config, max_samples)
        }
        Command::Extract { input, output, config } => {
            let config = load_config(config.as_deref())?;
            extract(&input, &output, config)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ScoringConfig> {
    let Some(path) = path else {
        return Ok(ScoringConfig::default());
    };
    let input = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    ScoringConfig::from_json(&input).with_context(|| format!("parsing config {}", path.display()))
}

fn score(
    input: &Path,
    output: &Path,
    failures_path: &Path,
    archive: Option<&Path>,
    config: ScoringConfig,
    max_samples: Option<usize>,
) -> Result<()> {
    info!(path = %input.display(), "reading requests");
    let mut requests: Vec<EvaluationRequest> = read_records(input)?;
    if let Some(limit) = max_samples {
        requests.truncate(limit);
    }
    info!(records = requests.len(), policy = ?config.policy, "scoring summaries");

    let scorer = Scorer::new(config);

    // Each (post, summary) pair is independent; collect keeps input order
    let results: Vec<_> = requests
        .par_iter()
        .enumerate()
        .map(|(position, request)| {
            let index = request.index.unwrap_or(position as u64);
            (index, request, scorer.evaluate(request))
        })
        .collect();

    let mut scored = Vec::new();
    let mut failures = Vec::new();
    let mut batch = ScoredBatch { version: 1, records: Vec::new() };

    for (index, request, result) in results {
        match result {
            Ok(evaluation) => {
                batch.records.push(ScoredRecord { index, output: evaluation.output.clone() });
                scored.push(ScoredOutput {
                    index,
                    original_post: request.original_post.clone(),
                    generated_summary: request.generated_summary.clone().unwrap_or_default(),
                    textual_feedback: evaluation.output.textual_feedback,
                    word_score_list: evaluation.output.word_score_list,
                    diagnostics: evaluation.reports,
                });
            }
            Err(err) => {
                warn!(index, error = %err, "record rejected");
                failures.push(Failure { index, reason: err.to_string() });
            }
        }
    }

    write_json(output, &scored)?;
    info!(path = %output.display(), scored = scored.len(), "results written");

    // Written even when empty so a file left by an earlier run never looks current
    write_json(failures_path, &failures)?;
    if failures.is_empty() {
        info!(path = %failures_path.display(), "no records rejected");
    } else {
        warn!(path = %failures_path.display(), failed = failures.len(), "some records were rejected");
    }

    if let Some(path) = archive {
        let mut serializer = AllocSerializer::<1024>::default();
        serializer
            .serialize_value(&batch)
            .map_err(|e| anyhow::anyhow!("rkyv serialization failed: {:?}", e))?;
        let bytes = serializer.into_serializer().into_inner();
        fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), bytes = bytes.len(), "archive written");
    }

    Ok(())
}

fn extract(input: &Path, output: &Path, config: ScoringConfig) -> Result<()> {
    let records: Vec<ResponseRecord> = read_records(input)?;
    let scorer = Scorer::new(config);
    info!(records = records.len(), "extracting model responses");

    let extracted: Vec<ExtractedOutput> = records
        .par_iter()
        .enumerate()
        .map(|(position, record)| {
            let index = record.index.unwrap_or(position as u64);
            let word_score_list = extract_word_scores(&record.model_response);
            if word_score_list.is_empty() {
                warn!(index, "no word scores recovered from response");
            }

            let reference = match (&record.word_score_list, &record.generated_summary) {
                (Some(reference), _) => Some(reference.clone()),
                (None, Some(summary)) => match scorer.score(summary, "", &record.phrases) {
                    Ok(evaluation) => Some(evaluation.output.word_score_list),
                    Err(err) => {
                        warn!(index, error = %err, "could not compile reference scores");
                        None
                    }
                },
                (None, None) => None,
            };

            ExtractedOutput {
                index,
                textual_feedback: extract_textual_feedback(&record.model_response),
                agreement: reference.map(|reference| compare(&reference, &word_score_list)),
                word_score_list,
            }
        })
        .collect();

    let compared: Vec<f64> = extracted
        .iter()
        .filter_map(|e| e.agreement.as_ref().map(|a| a.accuracy))
        .collect();
    if !compared.is_empty() {
        let mean = compared.iter().sum::<f64>() / compared.len() as f64;
        info!(compared = compared.len(), mean_accuracy = mean, "agreement with reference scores");
    }

    write_json(output, &extracted)?;
    info!(path = %output.display(), "extraction written");
    Ok(())
}
