use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    planfit::run().await
}
