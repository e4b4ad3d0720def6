mod host_app_state;
mod host_config;
pub(crate) mod services;
mod spawn_host;

pub use crate::{
    host_app_state::HostAppState, host_config::HostConfig,
    services::invoke::InvocationRequest, spawn_host::spawn_host,
};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Pretty,
}
