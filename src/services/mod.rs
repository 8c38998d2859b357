pub mod memory;
pub mod remote;
pub mod session;
pub mod store;
