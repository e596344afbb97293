//! Switchboard Server Binary
//!
//! Standalone entry point - delegates to lib.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables still apply
    dotenv::dotenv().ok();

    let cwd = std::env::current_dir()?;
    let config = switchboard_core::load_config(&cwd)?;

    switchboard_server::run_server(config).await
}
