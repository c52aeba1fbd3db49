pub mod config;
pub mod enums;
pub mod error;
pub mod providers;
pub mod chains;
pub mod rpc;
pub mod services;
pub mod api;

pub use config::{ Config, NetworkConfig, NetworkEndpoint, WatchTarget };
pub use enums::{ Chain, NetworkMode };
pub use error::{ AppError, Result };
pub use providers::{ BalanceRequest, BalanceResult, ChainProvider };
pub use services::{ BalanceWatcher, MultiChainBalanceClient, WatchUpdate };
