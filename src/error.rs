use thiserror::Error;

/// Errores del catálogo. Los cargadores los devuelven; las capas que deben
/// degradar (datos, blacklist, links, índice) los registran y siguen con
/// colecciones vacías.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("error de E/S: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),
    #[error("se esperaba un arreglo de registros, se recibió {0}")]
    NotAnArray(&'static str),
    #[error("opciones de índice inválidas: {0}")]
    IndexOptions(String),
    #[error("valor inválido para {key}: '{value}'")]
    Config { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
