#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vertagger_server::start().await
}
