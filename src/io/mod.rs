pub mod store;
pub mod state;
pub mod config_io;
