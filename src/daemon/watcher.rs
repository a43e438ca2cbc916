use notify::{EventKind, RecursiveMode, Watcher};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Watch the settings file's directory and send `()` whenever the file
/// itself is written or replaced.
pub fn start_config_watcher(settings_path: PathBuf) -> mpsc::Receiver<()> {
    let (watch_tx, watch_rx) = mpsc::channel::<()>(10);

    std::thread::spawn(move || {
        let Some(dir) = settings_path.parent().map(|p| p.to_path_buf()) else {
            error!(target: "qpowerhal::daemon", "Settings path {} has no parent", settings_path.display());
            return;
        };
        let file_name = settings_path.file_name().map(|n| n.to_os_string());
        let tx = watch_tx;

        let mut watcher = match notify::recommended_watcher(
            move |res: Result<notify::Event, notify::Error>| {
                if let Ok(event) = res
                    && matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
                    && event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name)
                {
                    debug!(target: "qpowerhal::daemon", "Settings file changed");
                    let _ = tx.blocking_send(());
                }
            },
        ) {
            Ok(w) => w,
            Err(e) => {
                error!(target: "qpowerhal::daemon", "Failed to create settings watcher: {}", e);
                return;
            }
        };

        if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
            error!(target: "qpowerhal::daemon", "Failed to watch {}: {}", dir.display(), e);
            return;
        }

        info!(target: "qpowerhal::daemon", "Config file watcher started");
        loop {
            std::thread::sleep(std::time::Duration::from_secs(3600));
        }
    });

    watch_rx
}
