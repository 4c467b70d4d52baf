pub mod account;
pub mod aggregate;
pub mod transfer;
