//! Entity models shared across the Fleetdesk backend.
//!
//! Only the fields the security core reads or writes are modelled here;
//! business entities (customers, receipts, drivers) live elsewhere.

pub mod account;
pub mod permission;
pub mod role;
