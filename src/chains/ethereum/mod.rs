pub mod provider;

pub use provider::EthereumProvider;
