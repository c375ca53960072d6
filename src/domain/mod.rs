// Domain layer - Grafana documents and query results
pub mod connection;
pub mod dashboard;
pub mod folder;
pub mod public_dashboard;
pub mod query;
