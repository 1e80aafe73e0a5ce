use std::net::SocketAddr;

use axum::Router;
use clap::Parser;
use todo_mcp::application::todo_service::TodoServiceImpl;
use todo_mcp::config::{Cli, Command};
use todo_mcp::http::routing::{self, todos};
use todo_mcp::infrastructure::memory_repo::InMemoryTodoRepository;
use todo_mcp::mcp::McpServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.command.uses_stdio());

    let service = TodoServiceImpl::new(InMemoryTodoRepository::new());

    match cli.command {
        Command::Serve(args) => serve_http(args.addr, app(service)).await?,
        Command::Mcp => {
            let mcp = McpServer::new(service);
            tokio::select! {
                res = mcp.serve_stdio() => res?,
                _ = shutdown_signal() => {}
            }
        }
        Command::All(args) => {
            let router = app(service.clone());
            let mcp = McpServer::new(service);
            // Either door closing ends the process; the store goes with it.
            tokio::select! {
                res = serve_http(args.addr, router) => res?,
                res = mcp.serve_stdio() => res?,
            }
        }
    }
    Ok(())
}

fn app(service: TodoServiceImpl<InMemoryTodoRepository>) -> Router {
    routing::app(todos::router(todos::AppState { service }))
}

fn init_tracing(stdio_reserved: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    // stdout belongs to the tool protocol when it is in use
    if stdio_reserved {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn serve_http(addr: SocketAddr, router: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}
