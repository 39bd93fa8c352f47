pub mod activities;
pub mod customers;
pub mod exercise_categories;
pub mod exercises;
pub mod health;
pub mod measurements;
pub mod membership_types;
pub mod memberships;
pub mod metrics;
pub mod payments;
pub mod program_exercises;
pub mod programs;
pub mod stats;
