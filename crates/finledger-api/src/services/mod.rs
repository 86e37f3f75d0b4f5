//! Entity services
//!
//! Thin pass-through to PostgreSQL, one service per entity. No business
//! logic lives here beyond soft-delete bookkeeping; the interesting part of
//! this system is the auth layer in front of these.

pub mod balance;
pub mod expense;
pub mod income;
pub mod trash;
pub mod user;

pub use balance::{BalanceService, BalanceUpdate, NewBalance};
pub use expense::{ExpenseService, ExpenseUpdate, NewExpense};
pub use income::{IncomeService, IncomeUpdate, NewIncome};
pub use trash::TrashService;
pub use user::{NewUser, UserService, UserUpdate};
