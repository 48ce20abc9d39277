#[tokio::main]
async fn main() -> anyhow::Result<()> {
    frame_lib::init_tracing()?;
    let config = frame_lib::load_config()?;
    frame_lib::run(config).await
}
