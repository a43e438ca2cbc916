use super::{app::*, client::IpcClient, output};
use crate::Result;
use crate::common::SOCKET_PATH;
use anyhow::bail;

pub async fn execute(cli: Cli) -> Result<()> {
    let socket = cli.socket.as_deref().unwrap_or(SOCKET_PATH);
    let client = IpcClient::with_path(socket);

    if !matches!(cli.command, Commands::Status) && !client.is_alive().await {
        bail!("Daemon is not running");
    }

    match cli.command {
        Commands::Status => {
            handle_status(&client).await?;
        }

        Commands::Ping => {
            if client.ping().await? {
                output::print_success("Daemon is alive (PONG)");
            } else {
                output::print_error("Daemon not responding");
            }
        }

        Commands::Reload => {
            let resp = client.send("RELOAD").await?;
            report(&resp, "Configuration reloaded")?;
        }

        Commands::Hint { name, payload } => {
            let cmd = match payload {
                Some(p) => format!("HINT {} {}", name, p),
                None => format!("HINT {}", name),
            };
            let resp = client.send(&cmd).await?;
            report(&resp, &format!("Hint {}", name))?;
        }

        Commands::Interactive { state } => {
            let cmd = format!("INTERACTIVE {}", state.as_wire());
            let resp = client.send(&cmd).await?;
            report(&resp, "Interactive")?;
        }

        Commands::Profile { profile } => {
            let cmd = format!("PROFILE {}", profile.to_upper_str());
            let resp = client.send(&cmd).await?;
            report(&resp, "Profile")?;
        }

        Commands::DoubleTap { state } => {
            let cmd = format!("FEATURE DOUBLE_TAP {}", state.as_wire());
            let resp = client.send(&cmd).await?;
            report(&resp, "Double tap to wake")?;
        }

        Commands::SetLog { level } => {
            let cmd = format!("SET_LOG {}", level.to_upper_str());
            let resp = client.send(&cmd).await?;
            report(&resp, "Log level set")?;
        }
    }

    Ok(())
}

/// Print an `OK ...` reply, turn `ERR ...` into an error.
fn report(resp: &str, what: &str) -> Result<()> {
    if let Some(err) = resp.strip_prefix("ERR ") {
        bail!("{}: {}", what, err);
    }
    let detail = resp.strip_prefix("OK ").unwrap_or(resp);
    output::print_success(&format!("{}: {}", what, detail));
    Ok(())
}

async fn handle_status(client: &IpcClient) -> Result<()> {
    if !client.is_alive().await {
        output::print_daemon_stopped();
        return Ok(());
    }

    let response = client.send("STATUS").await?;
    output::print_status(&response);
    Ok(())
}
