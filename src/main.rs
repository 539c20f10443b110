use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    bearer_gate::app::run().await
}
