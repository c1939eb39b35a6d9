#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = phasegate_rust::run().await {
        eprintln!("phasegate-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
