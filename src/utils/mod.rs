pub mod db_connect;
pub mod env;
pub mod resolver_config;
