pub mod config;
pub mod hosts;

pub use config::handle_config_command;
pub use hosts::handle_host_command;
