use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "qpowerhalctl")]
#[command(version, about = "QPowerHAL daemon control CLI")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    #[arg(short, long, global = true)]
    pub socket: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    Status,
    Ping,
    Reload,

    /// Send a raw power hint, e.g. `hint cpu_boost 50000`.
    Hint {
        name: String,
        /// Integer or `key=value;...` metadata.
        payload: Option<String>,
    },

    Interactive {
        #[arg(value_enum)]
        state: Switch,
    },

    Profile {
        #[arg(value_enum)]
        profile: ProfileMode,
    },

    DoubleTap {
        #[arg(value_enum)]
        state: Switch,
    },

    SetLog {
        #[arg(value_enum)]
        level: LogLevel,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::On => "1",
            Self::Off => "0",
        }
    }
}

#[derive(Clone, ValueEnum)]
pub enum ProfileMode {
    Balanced,
    HighPerformance,
    PowerSave,
    BiasPower,
    BiasPerformance,
}

impl ProfileMode {
    pub fn to_upper_str(&self) -> &'static str {
        match self {
            Self::Balanced => "BALANCED",
            Self::HighPerformance => "HIGH_PERFORMANCE",
            Self::PowerSave => "POWER_SAVE",
            Self::BiasPower => "BIAS_POWER",
            Self::BiasPerformance => "BIAS_PERFORMANCE",
        }
    }
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_upper_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}
