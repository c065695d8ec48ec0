pub mod db;
pub mod domain;
pub mod error;
pub mod fact_checks;
pub mod settings;
pub mod store;
