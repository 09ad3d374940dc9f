use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "freshet")]
#[command(about = "Scrape dynamically rendered sites into normalized feeds", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the registered site adapters
    List,
    /// Run one adapter and print the resulting feed as JSON
    Fetch {
        /// Site id of the adapter to run (see `freshet list`)
        site_id: String,

        /// Page number for paginated listings
        #[arg(short, long)]
        page: Option<u32>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}
