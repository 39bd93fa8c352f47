pub mod error_context;
