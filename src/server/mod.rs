//! TCP server for the Kafka wire protocol.

mod connection;

pub use connection::{handle_connection, run_server, run_server_on_listener};
