use clap::Parser;
use mimalloc::MiMalloc;
use tracing::{warn, Level};

use request_inspector::application;
use request_inspector::config::Config;
use request_inspector::infrastructure::InspectorServer;
use request_inspector::AnyResult;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> AnyResult<()> {
    // before the runtime starts any threads
    application::init_local_offset();

    tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(config))
}

async fn run(config: Config) -> AnyResult<()> {
    let server = InspectorServer::bind(&config).await?;
    println!("{}", config.banner());

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "unable to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            println!("\n\n🛑 サーバーを停止しています...");
        })
        .await?;

    println!("✅ サーバーが停止しました\n");
    Ok(())
}
