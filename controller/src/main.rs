mod host;
mod page;
mod sim;
mod storage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    host::run().await
}
