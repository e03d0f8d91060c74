// marcador services
// Stateless rules and configuration: hit ranking and the config file.

pub mod config_engine;
pub mod ranking_engine;
