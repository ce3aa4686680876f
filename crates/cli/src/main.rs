use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use pagegrade_core::{
    AnalysisConfig, Analyzer, ExtractConfig, ExtractedContent, FetchConfig, JsonConfig, OpenAiClient, ProviderSettings,
    RetryPolicy, TextConfig, TextFormatter, convert_to_json, extract_with_config, extracted_to_json, fetch_file,
    fetch_stdin, fetch_url,
};
use tracing_subscriber::EnvFilter;
use url::Url;

mod echo;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, json", s)),
        }
    }
}

/// Rate the readability, SEO and sentiment of a web page
#[derive(Parser, Debug)]
#[command(name = "pagegrade")]
#[command(version)]
#[command(about = "Rate the readability, SEO and sentiment of a web page", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Keyphrase the SEO passes are judged against
    #[arg(short, long, default_value = "", value_name = "PHRASE")]
    keyphrase: String,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Model identifier (overrides PAGEGRADE_MODEL)
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,

    /// Time budget per analysis pass in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    pass_timeout: u64,

    /// Skip the sentiment pass
    #[arg(long)]
    no_sentiment: bool,

    /// Only extract the text sample, without contacting the provider
    #[arg(long)]
    extract_only: bool,

    /// Include the analyzed text sample in the report
    #[arg(long)]
    sample: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "pagegrade_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Reads the page and returns it with its base URL, when it has one.
async fn read_input(args: &Args) -> anyhow::Result<(String, Option<Url>)> {
    if args.input == "-" {
        if args.verbose {
            echo::print_step(1, 4, "Reading from stdin");
        }
        let html = fetch_stdin().context("Failed to read from stdin")?;
        Ok((html, None))
    } else if args.input.starts_with("http://") || args.input.starts_with("https://") {
        if args.verbose {
            echo::print_step(1, 4, &format!("Fetching from {}", args.input.bright_white().underline()));
        }
        let mut config = FetchConfig { timeout: args.timeout, ..Default::default() };
        if let Some(user_agent) = &args.user_agent {
            config.user_agent = user_agent.clone();
        }
        let html = fetch_url(&args.input, &config).await.context("Failed to fetch URL")?;
        let base_url = Url::parse(&args.input).ok();
        Ok((html, base_url))
    } else {
        if args.verbose {
            echo::print_step(1, 4, &format!("Reading from file {}", args.input.bright_white()));
        }
        let html = fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?;
        Ok((html, None))
    }
}

fn render_extracted(content: &ExtractedContent, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => extracted_to_json(content, true).context("Failed to serialize extracted content"),
        OutputFormat::Text if content.title.is_empty() => Ok(content.body_text.clone()),
        OutputFormat::Text => Ok(format!("{}\n\n{}", content.title, content.body_text)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let provider = if args.extract_only {
        None
    } else {
        let settings = ProviderSettings::from_env();
        let provider = settings.require().context("Cannot analyze without a provider credential")?.clone();
        Some(match &args.model {
            Some(model) => provider.with_model(model),
            None => provider,
        })
    };

    let (html, base_url) = read_input(&args).await?;

    if args.verbose {
        eprintln!("  {} {}", "Size:".dimmed(), echo::format_size(html.len()).bright_white());
        eprintln!();
        echo::print_step(2, 4, "Extracting text sample");
    }

    let content = extract_with_config(&html, base_url.as_ref(), &ExtractConfig::default());

    if args.verbose {
        echo::print_extraction_details(&content);
    }

    let output = match provider {
        None => render_extracted(&content, args.format)?,
        Some(provider) => {
            if content.is_empty() {
                bail!("No readable text found in {}", args.input);
            }

            if args.verbose {
                echo::print_step(3, 4, &format!("Analyzing with {}", provider.model.bright_white()));
            }

            let config = AnalysisConfig::default()
                .with_model(provider.model.clone())
                .with_pass_timeout(Duration::from_secs(args.pass_timeout))
                .with_sentiment(!args.no_sentiment);
            let client = OpenAiClient::new(provider)
                .context("Failed to build provider client")?
                .with_retry(RetryPolicy::default());

            let started = Instant::now();
            let result = Analyzer::new(Arc::new(client), config)
                .analyze_content(&content, &args.keyphrase)
                .await
                .context("Analysis failed")?;

            if args.verbose {
                echo::print_timing("Analysis", started.elapsed());
                eprintln!();
            }
            for pass in &result.failed_passes {
                echo::print_warning(&format!("The {} pass failed; its facet is left empty", pass));
            }

            match args.format {
                OutputFormat::Json => {
                    let config = JsonConfig { include_sample: args.sample, pretty: true };
                    convert_to_json(&result, &config).context("Failed to serialize analysis")?
                }
                OutputFormat::Text => {
                    let config = TextConfig { line_width: 80, include_sample: args.sample };
                    TextFormatter::new(config).convert(&result)
                }
            }
        }
    };

    if args.verbose {
        echo::print_step(4, 4, "Writing output");
        eprintln!("  {} {}", "Format:".dimmed(), format!("{:?}", args.format).bright_white());
        eprintln!();
    }

    match args.output {
        Some(path) => {
            fs::write(&path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(())
}
