pub const SOCKET_PATH: &str = "/dev/socket/qpowerhal.sock";
pub const CONFIG_DIR: &str = "/data/vendor/qpowerhal";
pub const SETTINGS_FILE: &str = "/data/vendor/qpowerhal/settings.toml";
