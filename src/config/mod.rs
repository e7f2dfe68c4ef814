//! Configuration system: TOML-backed schema structs with a process-wide
//! thread-safe instance and hot-reload support.

mod schemas;
mod utils;

pub use schemas::{Config, ContractsConfig, DispatchConfig, FeedbackConfig, WebserverConfig};
pub use utils::{
    get_config_clone, load_config, load_config_from_path, reload_config, reload_config_from_path,
    save_config, with_config, CONFIG, CONFIG_FILE_PATH,
};
