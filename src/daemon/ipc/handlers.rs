use super::commands::Command;
use super::server::IpcHandles;
use crate::common::types::DaemonStatus;
use crate::core::hint::{Feature, PowerHint};
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tracing::debug;

const HELP: &str = "CMDS:
        - HELP | ?
        - STATUS
        - RELOAD
        - SETLOG <DEBUG|INFO|WARN|ERROR>
        - HINT <name> [payload]
        - INTERACTIVE <0|1>
        - PROFILE <name|0-4>
        - FEATURE DOUBLE_TAP <0|1>
        - PING
        - QUIT
";

/// Handle a single IPC client connection.
pub async fn handle_client(stream: UnixStream, h: IpcHandles) -> Result<()> {
    let (r, mut w) = stream.into_split();
    let mut reader = BufReader::new(r);
    let mut line = String::new();
    w.write_all(b"OK QPOWERHAL IPC\n").await?;

    while reader.read_line(&mut line).await? > 0 {
        let s = line.trim();
        if s.len() > 256 {
            w.write_all(b"ERR input too long\n").await?;
            line.clear();
            continue;
        }
        if s.is_empty() {
            line.clear();
            continue;
        }
        debug!(target: "qpowerhal::ipc", "<- {}", s);

        let resp = match s.parse::<Command>() {
            Ok(Command::Help) => HELP.to_string(),
            Ok(Command::Ping) => "PONG\n".into(),
            Ok(Command::Quit) => {
                w.write_all(b"BYE\n").await?;
                break;
            }
            Ok(Command::Status) => status(&h),
            Ok(Command::Reload) => match (h.reload_fn)() {
                Ok(n) => format!("OK RELOADED {}\n", n),
                Err(e) => format!("ERR RELOAD {:#}\n", e),
            },
            Ok(Command::SetLog(lvl)) => {
                (h.set_log_level)(lvl);
                format!("OK SET_LOG {}\n", lvl.to_upper_str())
            }
            Ok(Command::Hint(name, payload)) => match PowerHint::parse(&name, payload.as_deref()) {
                Ok(hint) => format!("OK {}\n", h.hal.power_hint(hint)),
                Err(e) => format!("ERR {:#}\n", e),
            },
            Ok(Command::Interactive(on)) => format!("OK {}\n", h.hal.set_interactive(on)),
            Ok(Command::Profile(profile)) => {
                let status = h.hal.power_hint(PowerHint::SetProfile(profile.id()));
                format!("OK {} {}\n", status, h.hal.current_profile().to_upper_str())
            }
            Ok(Command::DoubleTap(on)) => {
                format!("OK {}\n", h.hal.set_feature(Feature::DoubleTapToWake, on))
            }
            Err(e) => format!("ERR {}\n", e),
        };
        w.write_all(resp.as_bytes()).await?;
        line.clear();
    }
    Ok(())
}

fn status(h: &IpcHandles) -> String {
    let log_level = h
        .current_log_level
        .read()
        .map(|l| *l)
        .unwrap_or_else(|e| *e.into_inner());
    let status = DaemonStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        log_level,
        config: h.config_path.to_string(),
        hal: h.hal.status(),
    };
    match serde_json::to_string(&status) {
        Ok(json) => format!("{}\n", json),
        Err(e) => format!("ERR JSON {:?}\n", e),
    }
}
