use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, LevelFilter};
use serde::Serialize;

use genome_matcher::io::fasta;
use genome_matcher::util::dna;
use genome_matcher::{GenomeMatch, GenomeMatcher, QueryError};

const DEFAULT_SEARCH_LENGTH: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "genome-matcher", author, version, about = "Find DNA fragments and related genomes in an in-memory library", arg_required_else_help = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find library genomes containing a DNA fragment
    Find {
        /// Library FASTA file
        #[arg(short = 'l', long = "library")]
        library: String,
        /// Fragment to search for
        #[arg(short, long)]
        fragment: String,
        /// Shortest match to report (defaults to the search length)
        #[arg(short = 'm', long = "min-length")]
        min_length: Option<usize>,
        /// Seed length K used to index the library
        #[arg(short = 'k', long = "search-length", default_value_t = DEFAULT_SEARCH_LENGTH)]
        search_length: usize,
        /// Disallow substitutions
        #[arg(long)]
        exact: bool,
    },
    /// Score library genomes by similarity to each record of a query FASTA
    Related {
        /// Library FASTA file
        #[arg(short = 'l', long = "library")]
        library: String,
        /// Query FASTA file
        #[arg(short, long)]
        query: String,
        /// Window length (defaults to the search length)
        #[arg(short = 'f', long = "fragment-length")]
        fragment_length: Option<usize>,
        /// Minimum percentage of matching windows
        #[arg(long, default_value_t = 20.0)]
        threshold: f64,
        /// Seed length K used to index the library
        #[arg(short = 'k', long = "search-length", default_value_t = DEFAULT_SEARCH_LENGTH)]
        search_length: usize,
        /// Disallow substitutions
        #[arg(long)]
        exact: bool,
        /// Worker threads for window queries (0 = all cores)
        #[arg(short = 't', long = "threads", default_value_t = 0)]
        threads: usize,
    },
}

#[derive(Serialize)]
struct RelatedReport<'a> {
    query: &'a str,
    matches: Vec<GenomeMatch>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Find { library, fragment, min_length, search_length, exact } => {
            run_find(&library, &fragment, min_length, search_length, exact, cli.format)
        }
        Commands::Related { library, query, fragment_length, threshold, search_length, exact, threads } => {
            if threads > 0 {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build_global()
                    .context("cannot configure worker threads")?;
            }
            run_related(&library, &query, fragment_length, threshold, search_length, exact, cli.format)
        }
    }
}

fn build_matcher(library: &str, search_length: usize) -> Result<GenomeMatcher> {
    let genomes = fasta::load_genomes_from_path(library)
        .with_context(|| format!("cannot load library '{}'", library))?;
    if genomes.is_empty() {
        anyhow::bail!("library '{}' contains no genomes", library);
    }

    let mut matcher = GenomeMatcher::new(search_length);
    let total_len: usize = genomes.iter().map(|g| g.len()).sum();
    for g in &genomes {
        matcher.add_genome(g);
    }
    info!(
        "library: {} ({} records, {} bp, {} indexed with K={})",
        library,
        genomes.len(),
        total_len,
        matcher.genomes().len(),
        matcher.minimum_search_length()
    );
    Ok(matcher)
}

fn run_find(
    library: &str,
    fragment: &str,
    min_length: Option<usize>,
    search_length: usize,
    exact: bool,
    format: OutputFormat,
) -> Result<()> {
    let fragment = dna::normalize_seq(fragment.as_bytes())
        .map_err(|(i, b)| anyhow::anyhow!("fragment has invalid base {:?} at offset {}", char::from(b), i))?;
    let matcher = build_matcher(library, search_length)?;
    let min_length = min_length.unwrap_or(matcher.minimum_search_length());

    let matches = match matcher.find_genomes_with_this_dna(&fragment, min_length, exact) {
        Ok(m) => m,
        Err(QueryError::NoMatches) => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&matches)?),
        OutputFormat::Text if matches.is_empty() => println!("no matches"),
        OutputFormat::Text => {
            for m in &matches {
                println!("{}\t{}\t{}", m.genome_name, m.position, m.length);
            }
        }
    }
    Ok(())
}

fn run_related(
    library: &str,
    query_path: &str,
    fragment_length: Option<usize>,
    threshold: f64,
    search_length: usize,
    exact: bool,
    format: OutputFormat,
) -> Result<()> {
    if !(0.0..=100.0).contains(&threshold) {
        anyhow::bail!("threshold must be between 0 and 100, got {}", threshold);
    }
    let matcher = build_matcher(library, search_length)?;
    let fragment_length = fragment_length.unwrap_or(matcher.minimum_search_length());
    let queries = fasta::load_genomes_from_path(query_path)
        .with_context(|| format!("cannot load queries '{}'", query_path))?;
    info!("queries: {} ({} records)", query_path, queries.len());

    let mut reports = Vec::with_capacity(queries.len());
    for q in &queries {
        let matches = match matcher.find_related_genomes(q, fragment_length, exact, threshold) {
            Ok(m) => m,
            Err(QueryError::NoMatches) => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        reports.push(RelatedReport { query: q.name(), matches });
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => {
            for r in &reports {
                println!("# {}", r.query);
                if r.matches.is_empty() {
                    println!("no matches");
                }
                for m in &r.matches {
                    println!("{}\t{:.2}", m.genome_name, m.percent_match);
                }
            }
        }
    }
    Ok(())
}
