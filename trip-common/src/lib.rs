pub mod fragment;
pub mod metrics;
pub mod statemap;
