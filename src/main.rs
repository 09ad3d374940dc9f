use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use freshet::adapter;
use freshet::cli::{Cli, Commands};
use freshet::config::Config;
use freshet::pipeline::{AdapterPipeline, RequestParams};
use freshet::render::ChromeBackend;
use freshet::template::HtmlTemplates;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            for adapter in adapter::registry() {
                println!("{:<14} {}", adapter.site_id, adapter.feed_title);
            }
        }
        Commands::Fetch {
            site_id,
            page,
            pretty,
        } => {
            let config = Config::load()?;
            let backend = ChromeBackend::new(config.browser);
            let pipeline = AdapterPipeline::new(backend, HtmlTemplates);

            let params = RequestParams { page };
            let feed = pipeline.run_site(&site_id, &params).await?;

            let json = if pretty {
                serde_json::to_string_pretty(&feed)?
            } else {
                serde_json::to_string(&feed)?
            };
            println!("{json}");
        }
    }

    Ok(())
}
