pub mod attrs;
pub mod component;
pub mod error;
pub mod routes;
