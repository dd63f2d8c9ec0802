//! Core business logic for Kudi.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `credit` - BNPL credit ledger: wallet accounts, credit lines, repayment
//!   allocation, and the credit-score policy

pub mod credit;
