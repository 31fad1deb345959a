use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use tagknn::dataset::{generate_synthetic, write_csv, SyntheticConfig};
use tagknn::predict::{validate_k, validate_query};
use tagknn::{
    parse_tags, run_session, Dataset, LoadOptions, MetricPolicy, PredictOptions, Predictor,
    Report, ReportFormat, TieBreak,
};

#[derive(Debug, Parser)]
#[command(name = "tagknn")]
#[command(about = "Predict video engagement from tag-similar reference videos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Args)]
struct DatasetArgs {
    #[arg(long)]
    dataset: PathBuf,
    /// Fail the load on non-numeric counters instead of dropping the row.
    #[arg(long)]
    strict: bool,
    #[arg(long, default_value_t = ',')]
    field_delimiter: char,
    #[arg(long, default_value_t = ';')]
    tag_delimiter: char,
}

impl DatasetArgs {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            field_delimiter: self.field_delimiter,
            tag_delimiter: self.tag_delimiter,
            metric_policy: if self.strict {
                MetricPolicy::Strict
            } else {
                MetricPolicy::Skip
            },
        }
    }
}

#[derive(Debug, Args)]
struct RankArgs {
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
    #[arg(long, value_enum, default_value_t = TieBreak::Position)]
    tie_break: TieBreak,
    #[arg(long)]
    parallel: bool,
}

impl RankArgs {
    fn predict_options(&self, k: usize) -> PredictOptions {
        PredictOptions {
            k,
            tie_break: self.tie_break,
            parallel: self.parallel,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    Predict {
        #[arg(long, short)]
        k: usize,
        /// Query tags, e.g. "cat;dance".
        #[arg(long)]
        tags: String,
        #[command(flatten)]
        data: DatasetArgs,
        #[command(flatten)]
        rank: RankArgs,
    },
    /// Load the dataset once and answer one query per stdin line.
    Interactive {
        #[arg(long, short, default_value_t = 5)]
        k: usize,
        /// Write a synthetic dataset first when the path does not exist.
        #[arg(long)]
        generate_missing: bool,
        #[command(flatten)]
        data: DatasetArgs,
        #[command(flatten)]
        rank: RankArgs,
    },
    Generate {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 100)]
        rows: usize,
        #[arg(long, default_value_t = 0x5EED_1234_ABCD)]
        seed: u64,
        #[arg(long, default_value_t = 4)]
        max_tags: usize,
    },
    Version,
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Predict { k, tags, data, rank } => predict(&tags, &data, &rank, k),
        Command::Interactive {
            k,
            generate_missing,
            data,
            rank,
        } => interactive(&data, &rank, k, generate_missing),
        Command::Generate {
            out,
            rows,
            seed,
            max_tags,
        } => {
            let config = SyntheticConfig {
                seed,
                rows,
                max_tags,
            };
            let written = generate(&out, &config)?;
            println!("generated rows={written} path={}", out.display());
            Ok(())
        }
        Command::Version => {
            println!("{}", tagknn::VERSION);
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout carries only the report.
fn init_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_predictor(data: &DatasetArgs, options: PredictOptions) -> anyhow::Result<Predictor> {
    let dataset = Dataset::load(&data.dataset, &data.load_options())
        .with_context(|| format!("load dataset {}", data.dataset.display()))?;
    Ok(Predictor::new(dataset, options)?)
}

fn predict(raw_tags: &str, data: &DatasetArgs, rank: &RankArgs, k: usize) -> anyhow::Result<()> {
    validate_k(k)?;
    let query = parse_tags(raw_tags, data.tag_delimiter);
    validate_query(&query)?;

    let predictor = load_predictor(data, rank.predict_options(k))?;
    let outcome = predictor.predict(&query)?;

    let rendered = Report::from(&outcome).render(rank.format)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    if rank.format == ReportFormat::Json {
        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(())
}

fn interactive(
    data: &DatasetArgs,
    rank: &RankArgs,
    k: usize,
    generate_missing: bool,
) -> anyhow::Result<()> {
    validate_k(k)?;
    if generate_missing && !data.dataset.exists() {
        generate(&data.dataset, &SyntheticConfig::default())?;
    }

    let predictor = load_predictor(data, rank.predict_options(k))?;
    run_session(
        &predictor,
        std::io::stdin().lock(),
        std::io::stdout().lock(),
        std::io::stderr().lock(),
        data.tag_delimiter,
        rank.format,
    )?;
    Ok(())
}

fn generate(out: &Path, config: &SyntheticConfig) -> anyhow::Result<usize> {
    let rows = generate_synthetic(config);
    let file = std::fs::File::create(out).with_context(|| format!("create {}", out.display()))?;
    write_csv(&rows, std::io::BufWriter::new(file))?;
    tracing::info!(path = %out.display(), rows = rows.len(), "synthetic dataset written");
    Ok(rows.len())
}
