use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Parser)]
#[command(name = "nse200")]
#[command(about = "NSE 200-week moving average screener", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 8000)]
        port: u16,
    },
    /// Print the snapshot for one ticker and exit
    Check {
        /// Ticker symbol (e.g. RELIANCE, AAPL, ^NSEI)
        ticker: String,
    },
}

pub async fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            commands::serve::run(port).await;
        }
        Commands::Check { ticker } => {
            commands::check::run(&ticker).await;
        }
    }
}
