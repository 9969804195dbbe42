pub mod builder;
pub mod cli;
pub mod demo;
pub mod element;
pub mod error;
pub mod ident;
pub mod router;
pub mod service;
pub mod trace;
pub mod wire;
