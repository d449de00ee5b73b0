//! Lectura de los archivos de datos del catálogo.
//!
//! - `data.json`: arreglo de registros crudos.
//! - lista de exclusión: una columna, cabecera opcional `NORMALIZADO`.
//! - tabla de links: `nombre,url` por línea.
//!
//! Las funciones `load_*` nunca fallan: ante cualquier error registran un
//! `warn` y devuelven una colección vacía. Las variantes `read_*` devuelven
//! el error para quien lo necesite.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::Result;
use crate::search::exclusion::Blacklist;

/// Quita el BOM UTF-8 inicial, si existe.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Tabla nombre de institución (MAYÚSCULAS) -> URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstitutionLinks(HashMap<String, String>);

impl InstitutionLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, url: &str) {
        self.0.insert(name.trim().to_uppercase(), url.trim().to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.trim().to_uppercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parsea la lista de exclusión: un término por línea, sin líneas vacías.
/// Sólo la primera línea puede ser la cabecera `NORMALIZADO` (sin importar
/// mayúsculas); más abajo es un término como cualquier otro.
pub fn parse_blacklist(text: &str) -> Blacklist {
    let mut lines = strip_bom(text)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .peekable();
    if lines.next_if(|l| l.eq_ignore_ascii_case("NORMALIZADO")).is_some() {
        tracing::debug!("lista de exclusión con cabecera");
    }
    lines.collect()
}

/// Parsea la tabla de links. Se corta en la primera coma: la URL puede
/// contener comas. Se omiten filas sin nombre o sin URL.
pub fn parse_institution_links(text: &str) -> InstitutionLinks {
    let mut links = InstitutionLinks::new();
    for line in strip_bom(text).lines() {
        let Some((name, url)) = line.split_once(',') else {
            continue;
        };
        let (name, url) = (name.trim(), url.trim());
        if name.is_empty() || url.is_empty() {
            continue;
        }
        links.insert(name, url);
    }
    links
}

pub async fn read_catalog_json(path: &Path) -> Result<Value> {
    let bytes = tokio::fs::read(path).await?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(serde_json::from_str(strip_bom(&text))?)
}

async fn read_text(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Carga `data.json`. Devuelve `Value::Null` si no se puede leer o parsear;
/// el enriquecedor lo trata como catálogo vacío.
pub async fn load_catalog(path: &Path) -> Value {
    match read_catalog_json(path).await {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("no se pudo cargar el catálogo {:?}: {}", path, e);
            Value::Null
        }
    }
}

pub async fn load_blacklist(path: &Path) -> Blacklist {
    match read_text(path).await {
        Ok(text) => {
            let bl = parse_blacklist(&text);
            tracing::info!("lista de exclusión: {} términos", bl.len());
            bl
        }
        Err(e) => {
            tracing::warn!("lista de exclusión no disponible ({:?}): {}", path, e);
            Blacklist::default()
        }
    }
}

pub async fn load_institution_links(path: &Path) -> InstitutionLinks {
    match read_text(path).await {
        Ok(text) => {
            let links = parse_institution_links(&text);
            tracing::info!("links de instituciones: {}", links.len());
            links
        }
        Err(e) => {
            tracing::warn!("tabla de links no disponible ({:?}): {}", path, e);
            InstitutionLinks::new()
        }
    }
}
