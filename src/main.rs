use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use registry_flatten::{PipelineConfig, RenderedTable, parse_records_file, run_pipeline};

#[derive(Parser)]
#[command(name = "registry-flatten")]
#[command(author, version, about = "Business registration record flattening pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize, flatten and deduplicate a batch of company records
    Process {
        /// Input file (JSON array of company records)
        #[arg(short, long, default_value = "./tax_payers.json")]
        input: PathBuf,

        /// Output file for the JSON table
        #[arg(long, default_value = "./tax_payer_output.json")]
        json_output: PathBuf,

        /// Output file for the CSV table
        #[arg(long, default_value = "./tax_payer_output.csv")]
        csv_output: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run the pipeline and report stage counts without writing output
    Analyze {
        /// Input file (JSON array of company records)
        #[arg(short, long, default_value = "./tax_payers.json")]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            json_output,
            csv_output,
            verbose,
        } => {
            setup_logging(verbose);
            process_records(input, json_output, csv_output)
        }
        Commands::Analyze { input, verbose } => {
            setup_logging(verbose);
            analyze_records(input)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn process_records(input: PathBuf, json_output: PathBuf, csv_output: PathBuf) -> Result<()> {
    info!("Loading records from {:?}", input);
    let records = parse_records_file(&input).context("Failed to load input records")?;
    info!("Loaded {} records", records.len());

    let output = run_pipeline(records, &PipelineConfig::default()).context("Pipeline failed")?;

    // render both documents before writing either
    let rendered = RenderedTable::from_table(&output.table)?;
    rendered.write_files(&json_output, &csv_output)?;

    info!("JSON output written to {:?}", json_output);
    info!("CSV output written to {:?}", csv_output);
    info!("Complete: table shape {:?}", output.table.shape());

    Ok(())
}

fn analyze_records(input: PathBuf) -> Result<()> {
    info!("Analyzing records from {:?}", input);
    let records = parse_records_file(&input).context("Failed to load input records")?;
    let output = run_pipeline(records, &PipelineConfig::default()).context("Pipeline failed")?;
    let stats = &output.stats;

    println!("Record Analysis");
    println!("===============");
    println!("Input records: {}", stats.input_records);
    println!("Officer lists repaired: {}", stats.repair.repaired);
    println!("Records filtered out: {}", stats.repair.dropped);
    println!("Companies kept: {}", stats.normalization.companies);
    println!();

    println!("Rows");
    println!("----");
    println!(
        "Officers: {} ({} with address)",
        stats.normalization.officers, stats.normalization.officers_with_address
    );
    println!("Officer rows: {}", stats.officer_rows);
    println!("Agent rows: {}", stats.agent_rows);
    println!(
        "Merged rows: {} ({} duplicates collapsed)",
        stats.merged_rows,
        (stats.officer_rows + stats.agent_rows).saturating_sub(stats.merged_rows)
    );

    let (rows, columns) = output.table.shape();
    println!("Table shape: ({}, {})", rows, columns);

    Ok(())
}
