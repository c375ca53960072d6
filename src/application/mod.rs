// Application layer - Use cases over the Grafana gateway
pub mod connection_check;
pub mod dashboard_service;
pub mod dashboard_template;
pub mod folder_resolver;
pub mod grafana_api;
pub mod publisher;
pub mod query_validator;

#[cfg(test)]
pub mod fake_api;
