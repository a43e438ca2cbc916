mod commands;
mod handlers;
mod server;

pub use commands::Command;
pub use server::{IpcHandles, start};
