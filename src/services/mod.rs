// Wallet profile workflow
pub mod balance;
pub mod explorer;
pub mod history;
pub mod price;
pub mod profiler;
pub mod token_activity;
pub mod validator;
pub mod valuation;

// Re-export for convenience
pub use profiler::WalletProfiler;
