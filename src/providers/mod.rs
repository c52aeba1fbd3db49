pub mod chain_provider;

pub use chain_provider::{ BalanceRequest, BalanceResult, ChainProvider };
