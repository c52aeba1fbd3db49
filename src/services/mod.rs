pub mod balance_service;
pub mod watch_service;

pub use balance_service::MultiChainBalanceClient;
pub use watch_service::{ BalanceWatcher, WatchUpdate };
