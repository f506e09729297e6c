use nse200::cli;

#[tokio::main]
async fn main() {
    cli::run().await;
}
