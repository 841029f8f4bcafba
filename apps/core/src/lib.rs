pub mod action_executor;
pub mod catalog;
pub mod config;
pub mod contract;
pub mod environment;
pub mod logging;
pub mod model;
pub mod plugin;
pub mod results;
pub mod runtime;
pub mod search;
