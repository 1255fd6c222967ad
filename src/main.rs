//! Command-line entry point: reads benchmark tables or price series, runs the
//! analysis, and prints the rendered report to stdout. Plot series go to the
//! configured plot directory.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::LevelFilter;

use tambak_analyze::bits::run_bits;
use tambak_analyze::table::normalizer::read_table;
use tambak_analyze::{
    AnalyzeConfig, Baseline, CsvPlotSink, InputLayout, KnockoutSummary, PlotSink, RenderMode,
    Reporter, Result,
};

#[derive(Parser)]
#[command(name = "tambak-analyze")]
#[command(version, about = "Rank and compare float-conditioning benchmark results")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON configuration file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse one headerless benchmark TSV
    Analyse {
        /// Benchmark TSV, or '-' for stdin
        file: String,

        /// Comma-separated encoded field names, e.g. Exponent,Mantissa
        fields: String,

        /// Keep rows where any field used one of these chains, e.g. "[1, 2],[4]"
        #[arg(long)]
        only_codecs: Option<String>,

        /// Keep only these compressors (applied after the dominance report)
        #[arg(long)]
        only_compressors: Option<String>,

        /// Compare against the built-in reference sizes
        #[arg(long, value_enum)]
        baselines: Option<ReferenceSet>,

        #[arg(long)]
        top_n: Option<usize>,

        /// Render markup tables instead of text
        #[arg(long)]
        html: bool,
    },
    /// Summarise <ROOT>-nosplit.tsv and <ROOT>.tsv by knockout rate
    Knockout {
        root: PathBuf,

        #[arg(long)]
        html: bool,
    },
    /// Decompose a price series into IEEE-754 bit fields
    Bits {
        /// Price CSV with a header row
        csv: PathBuf,

        /// Decompose day-over-day returns instead of prices
        #[arg(long)]
        returns: bool,

        /// Price column name
        #[arg(long)]
        column: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReferenceSet {
    Floats,
    Doubles,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    builder.target(env_logger::Target::Stderr);

    // Just the level and message
    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(buf, "[{}] {}", record.level(), record.args())
    });

    let _ = builder.try_init();
}

fn load_config(path: Option<&Path>) -> Result<AnalyzeConfig> {
    match path {
        Some(path) => AnalyzeConfig::from_json_file(path),
        None => Ok(AnalyzeConfig::default()),
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyse {
            file,
            fields,
            only_codecs,
            only_compressors,
            baselines,
            top_n,
            html,
        } => {
            if let Some(codecs) = only_codecs {
                config.only_codecs = Some(vec![codecs]);
            }
            if let Some(compressors) = only_compressors {
                config.only_compressors = Some(split_list(&compressors));
            }
            match baselines {
                Some(ReferenceSet::Floats) => config.baselines = Baseline::reference_floats(),
                Some(ReferenceSet::Doubles) => config.baselines = Baseline::reference_doubles(),
                None => {}
            }
            if let Some(n) = top_n {
                config.top_n = n;
            }
            if html {
                config.render = RenderMode::Html;
            }
            config.validate()?;

            let layout = InputLayout::fields(&split_list(&fields))?;
            let reader: Box<dyn Read> = if file == "-" {
                Box::new(io::stdin().lock())
            } else {
                Box::new(File::open(&file)?)
            };
            let table = read_table(reader, &layout)?;
            let report = Reporter::new(&config).analyse(&table)?;
            print!("{}", report.render(config.render.terminal_formatter().as_ref()));
        }
        Commands::Knockout { root, html } => {
            if html {
                config.render = RenderMode::Html;
            }
            let summary = KnockoutSummary::load(&root)?;
            CsvPlotSink::new(&config.plot_dir).emit(&summary.to_plot())?;
            print!("{}", summary.to_report().render(config.render.terminal_formatter().as_ref()));
        }
        Commands::Bits { csv, returns, column } => {
            if returns {
                config.bits.returns = true;
            }
            if let Some(column) = column {
                config.bits.price_column = column;
            }
            config.validate()?;

            let mut sink = CsvPlotSink::new(&config.plot_dir);
            let report = run_bits(File::open(&csv)?, &config.bits, &mut sink)?;
            print!("{}", report.render(config.render.terminal_formatter().as_ref()));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
