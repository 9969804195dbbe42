pub mod deserialize;
pub mod serialize;
pub mod wire_model;
