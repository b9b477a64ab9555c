use clap::{Parser, Subcommand};
use sitekit::fetch::{Content, HttpFetcher, fetch_post_content};
use sitekit::imaging::{ResizeConfig, RustBackend, resize_directory};
use sitekit::settings::{self, Settings};
use sitekit::store::Store;
use sitekit::{archive, feed, generate, ingest, logger, output};
use spdlog::{error, info, warn};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sitekit")]
#[command(about = "Build utilities for a personal static website")]
#[command(long_about = "\
Build utilities for a personal static website

Galleries are listed in a markdown file under a `## Configuration` heading,
one per line inside the fenced block that follows it:

  directory: profile_image[: title[: location[: year]]]

  base/
  ├── gallery-config.md            # Gallery list
  ├── master-gallery.html          # Generated: card per gallery
  └── 2025-ff-cologne/
      ├── DSC_0042.jpg             # Full-size images
      ├── index.html               # Generated gallery page
      ├── thumbs/                  # Generated by `sitekit resize`
      └── medium/

Blog posts are read from the configured feed, diffed against the local
SQLite store, fetched, inserted, and rendered into a month-grouped archive.

Run 'sitekit gen-config' to print a documented sitekit.toml.")]
#[command(version)]
struct Cli {
    /// Settings file (missing file means stock defaults)
    #[arg(long, default_value = settings::SETTINGS_FILE, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(flatten)]
    Task(Task),
    /// Print a stock sitekit.toml with all options documented
    GenConfig,
}

/// Subcommands that run against loaded settings.
#[derive(Subcommand)]
enum Task {
    /// Generate every gallery page and the master page
    Galleries {
        /// Directory holding the gallery config and gallery directories
        #[arg(default_value = ".")]
        base: PathBuf,
    },
    /// Create thumbs/ and medium/ JPEG variants for a photo directory
    Resize {
        /// Directory of full-size JPEG images
        dir: PathBuf,
    },
    /// List feed entries that are not in the store
    MissingPosts {
        /// Print entries as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Print the extracted body of a single post page
    Scrape {
        /// Post URL
        url: String,
    },
    /// Fetch and insert every feed entry missing from the store
    Ingest {
        /// Report what would be inserted without fetching or writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Render the archive page from every stored post
    Archive,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = parse_cli();

    let task = match cli.command {
        Command::GenConfig => {
            print!("{}", settings::stock_settings_toml());
            return Ok(());
        }
        Command::Task(task) => task,
    };

    let settings = settings::load_settings(&cli.config)?;
    logger::configure_logger(&settings.log)?;

    match task {
        Task::Galleries { base } => {
            let report = generate::build_galleries(&base, &settings)?;
            output::print_build_report(&report, &base);
        }
        Task::Resize { dir } => {
            if !dir.is_dir() {
                error!("'{}' is not a valid directory", dir.display());
                std::process::exit(1);
            }
            run_resize(dir, &settings)?;
        }
        Task::MissingPosts { json } => {
            let missing = missing_posts(&settings)?;
            if json {
                println!("{}", output::missing_posts_json(&missing)?);
            } else {
                output::print_missing_posts(&missing);
            }
        }
        Task::Scrape { url } => {
            let fetcher = HttpFetcher::new(&settings.scrape)?;
            let content =
                fetch_post_content(&fetcher, &url, &settings.scrape.container_class);
            match &content {
                Content::Found(_) => {}
                Content::NotFound => warn!("No content container found at {}", url),
                Content::Failed(e) => warn!("Fetching {} failed: {}", url, e),
            }
            println!("{}", content.into_body());
        }
        Task::Ingest { dry_run } => {
            let fetcher = HttpFetcher::new(&settings.scrape)?;
            let store = Store::open(&settings.store.path)?;
            let entries = feed::fetch_feed(&fetcher, &settings.feed.url)?;
            let missing = feed::missing_entries(&entries, &store, &settings.feed.blog_name)?;
            info!(
                "{} of {} feed entries missing from the store",
                missing.len(),
                entries.len()
            );

            let report = ingest::ingest_missing(&missing, &store, &fetcher, &settings, dry_run);
            output::print_ingest_report(&report);
            if report.date_failures() > 0 {
                std::process::exit(1);
            }
        }
        Task::Archive => {
            let store = Store::open(&settings.store.path)?;
            let today = chrono::Local::now().date_naive();
            let summary = archive::write_archive(
                &store,
                &settings.archive.output,
                &settings.archive.title,
                today,
            )?;
            output::print_archive_summary(&summary, &settings.archive.output);
        }
    }

    Ok(())
}

/// Parse arguments. Usage errors exit with status 1; help and version exit 0.
fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    }
}

fn missing_posts(
    settings: &Settings,
) -> Result<Vec<sitekit::types::FeedEntry>, Box<dyn std::error::Error>> {
    let fetcher = HttpFetcher::new(&settings.scrape)?;
    let entries = feed::fetch_feed(&fetcher, &settings.feed.url)?;
    let store = Store::open(&settings.store.path)?;
    Ok(feed::missing_entries(
        &entries,
        &store,
        &settings.feed.blog_name,
    )?)
}

/// Resize with a printer thread draining progress events as they arrive.
fn run_resize(dir: PathBuf, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let config = ResizeConfig::from(&settings.resize);
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_resize_event(&event) {
                println!("{}", line);
            }
        }
    });

    let result = resize_directory(&RustBackend::new(), &dir, &config, Some(tx));
    printer
        .join()
        .map_err(|_| "resize progress printer panicked")?;

    let summary = result?;
    if summary.total == 0 {
        warn!("No JPEG images found in directory: {}", dir.display());
    }
    output::print_resize_summary(&summary);
    Ok(())
}
