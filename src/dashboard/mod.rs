pub mod actions;
pub mod columns;
pub mod exporter;
pub mod history;
pub mod importer;
pub mod metrics;
pub mod models;
pub mod report;
pub mod session;
