//! API handlers

pub mod auth;
pub mod balances;
pub mod expenses;
pub mod health;
pub mod incomes;
pub mod trash;
pub mod users;
