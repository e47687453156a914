//! Firescrape CLI - scrape a URL or search the web via Firecrawl

use clap::{ArgGroup, Parser, ValueEnum};
use firescrape::{
    execute, resolve_credential, Command, FirecrawlClient, ProcessEnvironment, ScrapeFormat,
    DEFAULT_API_URL,
};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

/// Output format for scraped pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Markdown rendered by Firecrawl
    #[default]
    Markdown,
    /// Cleaned HTML
    Html,
    /// Plain text extracted from the HTML
    Text,
}

impl From<OutputFormat> for ScrapeFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => ScrapeFormat::Markdown,
            OutputFormat::Html => ScrapeFormat::Html,
            OutputFormat::Text => ScrapeFormat::Text,
        }
    }
}

/// Firescrape - scrape web pages or search the web via Firecrawl
#[derive(Parser, Debug)]
#[command(name = "firescrape")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("target").required(true).args(["url", "search"])))]
struct Cli {
    /// URL to scrape
    #[arg(long)]
    url: Option<String>,

    /// Search query
    #[arg(long)]
    search: Option<String>,

    /// Output format for --url
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,

    /// Firecrawl API base URL
    #[arg(long, env = "FIRECRAWL_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
}

impl Cli {
    /// Command selected by the mutually exclusive --url / --search pair
    fn to_command(&self) -> Command {
        match &self.url {
            Some(url) => Command::scrape(url.as_str(), self.format.into()),
            None => Command::search(self.search.clone().unwrap_or_default()),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    let command = cli.to_command();

    let credential = match resolve_credential(&ProcessEnvironment::new()) {
        Ok(credential) => credential,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let client = match FirecrawlClient::builder(credential)
        .base_url(cli.api_url.as_str())
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match execute(&client, &command).await {
        Ok(content) => writeln_safe(&content),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Log to stderr so stdout only carries content; `RUST_LOG` overrides
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
