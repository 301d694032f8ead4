pub mod client_manager;

pub use client_manager::ClientManager;
