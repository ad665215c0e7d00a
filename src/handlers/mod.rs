pub mod auth;
pub mod branches;
pub mod categories;
pub mod common;
pub mod invoices;
pub mod menus;
pub mod orders;
pub mod reports;
pub mod reservations;
pub mod restaurants;
pub mod tables;
