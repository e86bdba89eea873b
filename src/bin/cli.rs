use clap::Parser;
use novelty_bloom_rs::{
    ApproximateSetStats, CancelToken, DEFAULT_SEQ_LEN, NoveltyError,
    OutputFormat, ReportWriter, RunConfig, RunConfigBuilder,
    ScalableBloomFilter, ScalableFilterConfig, SetProcessor, TEST_GROUP,
    TRAIN_GROUP, TerminatorFilter, TraceSet, TransferKind, common::bits2hr,
};
use std::{io, path::PathBuf, process::ExitCode};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const EXIT_FAILURE: u8 = 1;
const EXIT_INTERRUPTED: u8 = 2;

/// Measure how much new control flow each trace of a set adds to a model
/// built from all the traces before it.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Consider returns
    #[arg(short = 'r', long)]
    parse_ret: bool,

    /// Consider indirect calls
    #[arg(short = 'c', long)]
    parse_icall: bool,

    /// Consider indirect jumps
    #[arg(short = 'j', long)]
    parse_ijmp: bool,

    /// Sequence length to use
    #[arg(short = 's', long, default_value_t = DEFAULT_SEQ_LEN)]
    sequence_length: usize,

    /// Group to process, repeatable (default: b_train then b_test)
    #[arg(short, long = "group")]
    groups: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Capacity of the first shard of each Bloom filter
    /// (env: NOVELTY_INITIAL_CAPACITY)
    #[arg(long)]
    initial_capacity: Option<usize>,

    /// Target false positive rate of each Bloom filter
    /// (env: NOVELTY_ERROR_RATE)
    #[arg(long)]
    error_rate: Option<f64>,

    /// Log every trace
    #[arg(short, long)]
    verbose: bool,

    /// Set file listing trace locations under [b_train] / [b_test]
    set_file: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(NoveltyError::Interrupted) => {
            eprintln!("Keyboard Interrupt");
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries the report, logs go to stderr
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), NoveltyError> {
    let set = TraceSet::load(&cli.set_file)?;
    let config = build_config(cli)?;
    config.validate()?;

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .map_err(|e| io::Error::other(e.to_string()))?;

    let groups: Vec<&str> = if cli.groups.is_empty() {
        vec![TRAIN_GROUP, TEST_GROUP]
    } else {
        cli.groups.iter().map(String::as_str).collect()
    };

    info!(
        seq_len = config.seq_len,
        terminators = ?config.terminators,
        traces = set.total_traces(),
        "Starting"
    );

    let mut model = ScalableBloomFilter::new(config.model_filter.clone())?;
    let processor = SetProcessor::new(&config, &cancel);
    let mut writer = ReportWriter::new(io::stdout().lock(), cli.format);

    let mut result = Ok(());
    for label in groups {
        if set.group(label).is_empty() {
            warn!(
                group = label,
                available = ?set.labels().collect::<Vec<_>>(),
                "Group is empty or missing from set file"
            );
        }
        if let Err(e) =
            processor.process_set(&mut model, label, set.group(label), &mut writer)
        {
            result = Err(e);
            break;
        }
    }

    info!(
        shards = model.shard_count(),
        sequences = model.insert_count(),
        memory = %bits2hr(model.bit_count()),
        estimated_fpr = model.estimated_false_positive_rate(),
        "Model summary"
    );
    result
}

fn build_config(cli: &Cli) -> Result<RunConfig, NoveltyError> {
    let selected = [
        (cli.parse_ret, TransferKind::Return),
        (cli.parse_icall, TransferKind::IndirectCall),
        (cli.parse_ijmp, TransferKind::IndirectJump),
    ];
    let terminators = TerminatorFilter::from_kinds(
        selected
            .into_iter()
            .filter(|(enabled, _)| *enabled)
            .map(|(_, kind)| kind),
    )?;

    let mut filter_config = ScalableFilterConfig::from_env()?;
    if let Some(capacity) = cli.initial_capacity {
        filter_config.initial_capacity = capacity;
    }
    if let Some(rate) = cli.error_rate {
        filter_config.error_rate = rate;
    }

    RunConfigBuilder::default()
        .seq_len(cli.sequence_length)
        .terminators(terminators)
        .model_filter(filter_config.clone())
        .seen_filter(filter_config)
        .build()
        .map_err(|e| NoveltyError::InvalidConfig(e.to_string()))
}
