use crate::server;
use crate::services::{DirectoryCache, NseDirectorySource, YahooClient};
use std::sync::Arc;

pub async fn run(port: u16) {
    println!("Starting nse200 server on port {}", port);

    let market = match YahooClient::new() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("Failed to create market data client: {}", e);
            std::process::exit(1);
        }
    };

    let directory_source = match NseDirectorySource::new() {
        Ok(source) => Arc::new(source),
        Err(e) => {
            eprintln!("Failed to create directory client: {}", e);
            std::process::exit(1);
        }
    };
    let directory = Arc::new(DirectoryCache::new(directory_source));

    if let Err(e) = server::serve(market, directory, port).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
