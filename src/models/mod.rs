pub mod activity;
pub mod customer;
pub mod exercise;
pub mod measurement;
pub mod membership;
pub mod membership_type;
pub mod payment;
pub mod program;
pub mod stats;
