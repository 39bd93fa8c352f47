pub mod activities;
pub mod body;
pub mod customers;
pub mod exercises;
pub mod measurements;
pub mod membership_types;
pub mod memberships;
pub mod metrics;
pub mod payments;
pub mod programs;
pub mod stats;
pub mod status;
