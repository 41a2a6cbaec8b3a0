pub mod movement_server;
pub mod server_config;
