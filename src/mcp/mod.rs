//! Tool-protocol adapter: JSON-RPC 2.0 over newline-delimited stdio.
//!
//! Exposes `list_todos`, `get_todo`, `create_todo`, `update_todo` and
//! `delete_todo`, each a direct call into the shared store.

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::McpServer;
