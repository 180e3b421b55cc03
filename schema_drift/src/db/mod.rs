pub mod cache;
pub mod connection;
pub mod introspect;

pub use cache::SchemaCache;
pub use connection::connect;
pub use introspect::SchemaLoader;
