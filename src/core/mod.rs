pub mod classify;
pub mod estimator;
pub mod formatter;
pub mod models;
pub mod pricing;
