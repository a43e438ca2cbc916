use crate::common::types::LogLevel;
use crate::core::config::Settings;
use crate::core::hal::PowerHal;
use crate::daemon::config::DaemonConfig;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tokio::{signal, time};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const MIN_SWEEP_INTERVAL_MS: u64 = 10;

pub type ReloadHandle =
    tracing_subscriber::reload::Handle<tracing_subscriber::EnvFilter, tracing_subscriber::Registry>;

/// Swap the active log filter. Accepts a bare level or a full directive.
pub fn set_log_filter(handle: &ReloadHandle, filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(filter).with_context(|| format!("Bad log filter {:?}", filter))?;
    handle.reload(filter).context("Failed to reload log filter")
}

pub struct Daemon {
    pub(crate) cfg: DaemonConfig,
    pub(crate) hal: Arc<PowerHal>,
    pub(crate) filter_handle: ReloadHandle,
    pub(crate) current_log_level: Arc<RwLock<LogLevel>>,
}

impl Daemon {
    pub fn new(cfg: DaemonConfig, filter_handle: ReloadHandle) -> Result<Self> {
        let hal = Arc::new(cfg.build_hal()?);
        let level = LogLevel::parse(&cfg.settings.daemon.log_level).unwrap_or(LogLevel::Info);
        Ok(Self {
            cfg,
            hal,
            filter_handle,
            current_log_level: Arc::new(RwLock::new(level)),
        })
    }

    fn reload_settings(&self) {
        match reload(
            &self.cfg.settings_path,
            &self.hal,
            &self.filter_handle,
            &self.current_log_level,
        ) {
            Ok(n) => info!(target: "qpowerhal::daemon", "Settings reloaded: {} power hint tables", n),
            Err(e) => error!(target: "qpowerhal::daemon", "Failed to reload settings: {:#}", e),
        }
    }

    pub fn init_ipc(&self) {
        let hal = self.hal.clone();
        let path = self.cfg.settings_path.clone();
        let handle = self.filter_handle.clone();
        let level = self.current_log_level.clone();
        let reload_fn = Arc::new(move || reload(&path, &hal, &handle, &level));

        let handle = self.filter_handle.clone();
        let level = self.current_log_level.clone();
        let set_log_level = Arc::new(move |lvl: LogLevel| {
            if let Ok(mut l) = level.write() {
                *l = lvl;
            }
            match set_log_filter(&handle, &lvl.to_string()) {
                Ok(_) => debug!(target: "qpowerhal::ipc", "Log level changed to {}", lvl),
                Err(e) => error!(target: "qpowerhal::ipc", "Failed to change log level: {:#}", e),
            }
        });

        let ipc_handles = crate::daemon::ipc::IpcHandles {
            hal: self.hal.clone(),
            reload_fn,
            set_log_level,
            current_log_level: self.current_log_level.clone(),
            config_path: Arc::from(self.cfg.settings_path.to_string_lossy().as_ref()),
        };

        let socket = self.cfg.settings.daemon.socket.clone();
        tokio::spawn(async move {
            debug!(target: "qpowerhal::daemon", "Starting IPC socket listener...");
            match crate::daemon::ipc::start(&socket, ipc_handles).await {
                Ok(_) => info!(target: "qpowerhal::daemon", "IPC    | Listener stopped"),
                Err(e) => error!(target: "qpowerhal::daemon", "IPC    | Error: {:?}", e),
            }
        });
    }
}

/// Re-read the settings file and apply the parts that can change at
/// runtime: power hint tables and the log level.
fn reload(
    path: &Path,
    hal: &PowerHal,
    handle: &ReloadHandle,
    level: &RwLock<LogLevel>,
) -> Result<usize> {
    let settings = Settings::load_or_default(path)?;
    let count = settings.power_hints.count();
    hal.reload_hint_tables(settings.power_hints);

    set_log_filter(handle, &settings.daemon.log_level)?;
    if let Some(lvl) = LogLevel::parse(&settings.daemon.log_level)
        && let Ok(mut l) = level.write()
    {
        *l = lvl;
    }
    Ok(count)
}

pub async fn run_with_config(cfg: &DaemonConfig, filter_handle: ReloadHandle) -> Result<()> {
    let daemon = Daemon::new(cfg.clone(), filter_handle)?;

    daemon.init_ipc();

    let mut watch_rx = crate::daemon::watcher::start_config_watcher(cfg.settings_path.clone());

    let sweep_ms = cfg.settings.daemon.sweep_interval_ms.max(MIN_SWEEP_INTERVAL_MS);
    let mut sweep = time::interval(Duration::from_millis(sweep_ms));
    sweep.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
    debug!(target: "qpowerhal::daemon", "Sweep loop started ({}ms)", sweep_ms);

    loop {
        tokio::select! {
            _ = sweep.tick() => {
                daemon.hal.sweep(Instant::now());
            }
            Some(()) = watch_rx.recv() => {
                daemon.reload_settings();
            }
            _ = signal::ctrl_c() => {
                info!(target: "qpowerhal::daemon", "Daemon | Received Ctrl-C, shutting down");
                break;
            }
        }
    }

    daemon.hal.shutdown();
    let _ = std::fs::remove_file(&cfg.settings.daemon.socket);
    info!(target: "qpowerhal::daemon", "Daemon | Stopped");
    Ok(())
}
