use clap::{Parser, Subcommand};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::time::Duration;

use recipe_ingest::{AppConfig, Pipeline, RequestContext};

/// The CLI has no accounts; everything runs as this user with the system default model.
const CLI_USER: &str = "cli";

#[derive(Parser)]
#[command(name = "recipe-ingest")]
#[command(about = "Turn web pages, PDFs and notes into structured recipes")]
#[command(version)]
struct Cli {
    /// Abort the whole request after this many seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a recipe from a web page
    Url {
        /// Page to import
        url: String,
    },

    /// Import a recipe from a PDF file
    Pdf {
        /// Path to the PDF
        path: PathBuf,
    },

    /// Split free text into numbered instructions
    Instructions {
        /// Recipe text
        text: String,
    },

    /// Categorize shopping list items
    Categorize {
        /// Items to categorize
        #[arg(required = true)]
        items: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    debug!("Loaded configuration: {:?}", config);

    let pipeline = Pipeline::builder().config(config).build()?;

    let ctx = match cli.timeout {
        Some(seconds) => RequestContext::with_timeout(Duration::from_secs(seconds)),
        None => RequestContext::new(),
    };
    let token = ctx.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling request");
            token.cancel();
        }
    });

    let output = match cli.command {
        Commands::Url { url } => {
            let recipe = pipeline.imports.import_from_url(&ctx, CLI_USER, &url).await?;
            serde_json::to_value(recipe)?
        }
        Commands::Pdf { path } => {
            let data = std::fs::read(&path)?;
            let recipe = pipeline.imports.import_from_pdf(&ctx, CLI_USER, data).await?;
            serde_json::to_value(recipe)?
        }
        Commands::Instructions { text } => {
            let steps = pipeline
                .imports
                .parse_instructions(&ctx, CLI_USER, &text)
                .await?;
            serde_json::to_value(steps)?
        }
        Commands::Categorize { items } => {
            let categories = pipeline
                .shopping_lists
                .categorize_items(&ctx, CLI_USER, &items)
                .await?;
            let labelled: Map<String, Value> = items
                .into_iter()
                .zip(categories)
                .map(|(item, category)| (item, Value::from(category.as_str())))
                .collect();
            Value::Object(labelled)
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
