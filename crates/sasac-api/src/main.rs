#[tokio::main]
async fn main() {
    if let Err(err) = sasac_api::run().await {
        tracing::error!(error = %err, "sasac-api failed");
        std::process::exit(1);
    }
}
