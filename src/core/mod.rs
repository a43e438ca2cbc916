pub mod config;
pub mod debounce;
pub mod error;
pub mod feature;
pub mod governor;
pub mod hal;
pub mod hint;
pub mod lifecycle;
pub mod metadata;
pub mod perflock;
pub mod profile;
pub mod resources;
pub mod soc;
pub mod sysfs;
pub mod tables;
