pub mod access;

pub use access::{CLIENT_ID_HEADER, apply};
