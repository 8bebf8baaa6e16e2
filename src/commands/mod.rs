pub mod send;

pub use send::{SendOptions, parse_header, parse_payload, send};
