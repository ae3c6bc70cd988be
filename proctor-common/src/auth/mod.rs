pub mod errors;
pub mod roles;
