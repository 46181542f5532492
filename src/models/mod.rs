// src/models/mod.rs
pub mod job;
pub mod wallet;

pub use job::{JobFailure, JobSuccess, ValidatedJob};
pub use wallet::{TokenBalanceEntry, TransactionHistory, WalletProfile};
