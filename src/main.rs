use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hsn_summary::config::{ConfigOverrides, SummaryConfig};
use hsn_summary::pipeline;
use hsn_summary::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Summarize(args) => execute_summarize(args),
    }
}

fn execute_summarize(args: SummarizeArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(ToolError::MissingInput(args.input));
    }

    let config = args.resolve_config()?;
    let summary = pipeline::summarize_file(&args.input, &args.output, &config)?;

    if args.print {
        print!("{summary}");
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Summarise an HSN/SAC spreadsheet export by code and unit."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the summary workbook for an export.
    Summarize(SummarizeArgs),
}

#[derive(clap::Args)]
struct SummarizeArgs {
    /// Uploaded export (.xlsx or .xls).
    #[arg(long)]
    input: PathBuf,

    /// Summary workbook to write.
    #[arg(long, default_value = "HSN_summary.xlsx")]
    output: PathBuf,

    /// JSON file overriding the format settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cell text that marks the header row.
    #[arg(long)]
    marker: Option<String>,

    /// Boilerplate rows that follow the header row.
    #[arg(long)]
    boilerplate_rows: Option<usize>,

    /// Rows dropped after the boilerplate.
    #[arg(long)]
    offset_rows: Option<usize>,

    /// Column to drop; repeat to replace the default noise columns.
    #[arg(long = "drop-column")]
    drop_columns: Vec<String>,

    /// Group codes by their displayed text, so 1001 and "1001" match.
    #[arg(long)]
    match_key_text: bool,

    /// Fail on values that cannot be summed instead of counting them as zero.
    #[arg(long)]
    strict: bool,

    /// Print the summary to stdout.
    #[arg(long)]
    print: bool,
}

impl SummarizeArgs {
    fn resolve_config(&self) -> Result<SummaryConfig> {
        let config = match &self.config {
            Some(path) => SummaryConfig::from_json_file(path)?,
            None => SummaryConfig::default(),
        };

        let overrides = ConfigOverrides {
            marker: self.marker.clone(),
            boilerplate_rows: self.boilerplate_rows,
            offset_rows: self.offset_rows,
            noise_columns: self.drop_columns.clone(),
            match_key_text: self.match_key_text,
            strict: self.strict,
        };
        Ok(config.with_overrides(&overrides))
    }
}
