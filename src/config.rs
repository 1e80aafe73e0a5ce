use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_ADDR: &str = "127.0.0.1:8001";

#[derive(Debug, Parser)]
#[command(name = "todo-mcp", version, about = "In-memory todo list behind a REST API and a stdio tool server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the REST API
    Serve(HttpArgs),
    /// Serve the tools over stdin/stdout
    Mcp,
    /// Serve both front ends over one shared store
    All(HttpArgs),
}

#[derive(Debug, Clone, Args)]
pub struct HttpArgs {
    /// Address the REST API binds to
    #[arg(long, env = "TODO_ADDR", default_value = DEFAULT_ADDR)]
    pub addr: SocketAddr,
}

impl Command {
    /// Whether stdout is reserved for protocol traffic.
    pub fn uses_stdio(&self) -> bool { matches!(self, Command::Mcp | Command::All(_)) }
}
