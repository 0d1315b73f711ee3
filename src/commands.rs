pub mod generate_secret;
pub mod routes;
pub mod serve;
pub mod version;
