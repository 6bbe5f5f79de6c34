pub mod binder;
pub mod metrics;
pub mod orientation;
pub mod schedule;
