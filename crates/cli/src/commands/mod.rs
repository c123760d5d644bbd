pub mod logos;
pub mod prices;
pub mod solana;
pub mod stock;
pub mod uniswap;
