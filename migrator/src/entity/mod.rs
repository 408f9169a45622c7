pub mod cluster;
pub mod cluster_project;
pub mod platform_kubernetes;
pub mod project;
pub mod service;
