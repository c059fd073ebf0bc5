use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use spdlog::{info, warn};

use folio::config::Config;
use folio::listing::ListingPage;
use folio::logger::configure_logger;
use folio::pipeline::{build_site, load_index};
use folio::query_string::QueryString;
use folio::search::SearchQuery;
use folio::text_utils::format_date;

use crate::config::open_config;

mod config;

const CFG_FILE_NAME: &str = "folio.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Writes the RSS feed and the listing into the output directory
    Build,
    /// Lists posts matching a title text, tag or category
    Search {
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Query string form, e.g. "q=hooks&tag=react&page=2"
        #[arg(long, conflicts_with_all = ["text", "tag", "category"])]
        query: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Prints every tag and category with its post count
    Tags,
}

fn build(config: &Config) -> Result<bool> {
    let report = build_site(config)?;
    println!("{} documents, {} records, {} published", report.documents, report.records, report.published);
    if !report.validation.is_empty() {
        eprint!("{}", report.validation);
    }
    if let Some(ref err) = report.feed_error {
        eprintln!("Feed not written: {}", err);
    }
    if let Some(ref path) = report.feed_path {
        println!("Feed: {}", path.display());
    }
    println!("Listing: {}", report.listing_path.display());
    Ok(!report.has_errors())
}

fn search(config: &Config, query: SearchQuery, page: u32) -> Result<bool> {
    let (index, validation) = load_index(config)?;
    let result = ListingPage::query(&index, &query, page, config.defaults.page_size)
        .map_err(anyhow::Error::msg)?;

    for record in result.posts.iter() {
        println!("{}  {}  {}", format_date(&record.date), record.slug, record.title);
    }
    println!("Page {} of {} ({} posts)", result.page.current, result.page.page_count, result.total);
    Ok(validation.is_empty())
}

fn tags(config: &Config) -> Result<bool> {
    let (index, validation) = load_index(config)?;
    println!("Tags:");
    for facet in index.publishable_tags().facets() {
        println!("  {} ({})", facet.term, facet.count);
    }
    println!("Categories:");
    for facet in index.publishable_categories().facets() {
        println!("  {} ({})", facet.term, facet.count);
    }
    Ok(validation.is_empty())
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let config_path = args.config_path.map(PathBuf::from);

    let config = match open_config(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run folio --help");
            return Ok(ExitCode::FAILURE);
        }
    };

    if let Err(err) = configure_logger(config.log.as_ref()) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    info!("Starting folio =-=-=-=-=-=-=-=-=-=-=-=-=-=-=-");

    let clean = match args.command {
        Command::Build => build(&config)?,
        Command::Search { text, tag, category, query, page } => {
            let (query, page) = match query {
                Some(qs) => (SearchQuery::from_query_string(&qs), QueryString::from(&qs).get_page()),
                None => (SearchQuery { text, tag, category }, page),
            };
            search(&config, query, page)?
        }
        Command::Tags => tags(&config)?,
    };

    Ok(if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
