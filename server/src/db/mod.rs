pub mod clients;
pub mod interface;
