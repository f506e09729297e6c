use crate::services::{all_averages, YahooClient};

pub async fn run(ticker: &str) {
    let client = match YahooClient::new() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to create market data client: {}", e);
            std::process::exit(1);
        }
    };

    match all_averages(&client, ticker).await {
        Ok(snapshot) => match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize snapshot: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error fetching '{}': {}", ticker, e);
            std::process::exit(1);
        }
    }
}
