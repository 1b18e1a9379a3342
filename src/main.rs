#[tokio::main]
async fn main() -> anyhow::Result<()> {
    chemcraft::run_server().await
}
