#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mindscribe_server::start().await
}
