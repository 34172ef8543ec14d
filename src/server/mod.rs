pub mod app;
mod deserializers;
mod extractors;
pub mod routes;
