use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    risk_engine::run().await
}
