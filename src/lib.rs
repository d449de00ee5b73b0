// Biblioteca raíz del crate `catalogo`.
// Declara los módulos del buscador del catálogo y reexporta lo necesario
// para levantar el servidor desde `main`.
pub mod catalog;
pub mod config;
pub mod datafiles;
pub mod display;
pub mod error;
pub mod models;
pub mod ranking;
pub mod search;
pub mod server;
pub mod text;

pub use catalog::{Catalogo, Session};
pub use error::{CatalogError, Result};
/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
