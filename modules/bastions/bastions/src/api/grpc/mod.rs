mod server;

pub use server::{ArhServiceImpl, status_from_error};
