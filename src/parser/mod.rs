// Typed validation of the remote API's JSON payloads.

pub mod api_parser;

pub use api_parser::ApiParser;
