pub mod bitcoin;
pub mod ethereum;
pub mod solana;

pub use bitcoin::BitcoinProvider;
pub use ethereum::EthereumProvider;
pub use solana::SolanaProvider;
