//! Per-stack configuration: namespaced key/value entries with deterministic
//! ordering, persisted as `vellum.<stack>.yaml`.

mod file;
mod map;

pub use file::{config_file_path, load_stack_config, save_stack_config};
pub use map::{ConfigKey, ConfigMap, StackConfig};
