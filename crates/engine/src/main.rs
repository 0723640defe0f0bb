//! Content collection writer - main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use collection_rw_domain::KindRegistry;
use collection_rw_engine::{
    api, config::Args, infrastructure::neo4j::Neo4jGraph, telemetry, App,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    let args = Args::parse();
    telemetry::init(args.log_format);
    args.validate().map_err(anyhow::Error::msg)?;

    tracing::info!(env = %args.env, port = args.port, "Starting content collection writer");

    // Connect to Neo4j
    tracing::info!("Connecting to Neo4j at {}", args.neo_url);
    let graph = Neo4jGraph::connect(
        &args.neo_url,
        &args.neo_user,
        &args.neo_password,
        args.query_timeout(),
    )
    .await
    .context("could not connect to Neo4j")?;

    let registry = KindRegistry::standard().context("invalid collection kinds")?;
    let app = Arc::new(App::with_graph(Arc::new(graph), registry, args.env.clone()));

    // Constraints must exist before the first write.
    app.initialise()
        .await
        .context("failed to initialise collection constraints")?;

    let router = api::router(app);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    tracing::info!("Exiting content collection writer");
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
