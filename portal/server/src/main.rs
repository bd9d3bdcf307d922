#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = portal_server::config::Config::from_env()?;
    portal_server::web::start_web_server(config).await
}
