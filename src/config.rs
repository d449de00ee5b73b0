//! Configuración del servicio leída desde variables de entorno (y `.env`
//! si existe). Cada clave tiene un valor por defecto, así que un entorno
//! vacío produce una configuración válida.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CatalogError, Result};

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_DATA_FILE: &str = "data.json";
pub const DEFAULT_BLACKLIST_FILE: &str = "NAO_ENTRAM_CATALOGO.csv";
pub const DEFAULT_LINKS_FILE: &str = "INSTITUTION_LINKS.csv";

/// Piso de carga horaria observado en el catálogo publicado.
pub const DEFAULT_MIN_HOURS: f64 = 360.0;
/// Tolerancia del índice difuso (proporción de errores admitida).
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.35;
pub const DEFAULT_DEBOUNCE_MS: u64 = 180;

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: String,
    pub data_dir: PathBuf,
    pub data_file: String,
    pub blacklist_file: String,
    pub links_file: String,
    pub min_hours: f64,
    pub fuzzy_threshold: f64,
    pub debounce: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bind: DEFAULT_BIND.to_string(),
            data_dir: PathBuf::from("."),
            data_file: DEFAULT_DATA_FILE.to_string(),
            blacklist_file: DEFAULT_BLACKLIST_FILE.to_string(),
            links_file: DEFAULT_LINKS_FILE.to_string(),
            min_hours: DEFAULT_MIN_HOURS,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

impl Settings {
    /// Carga `.env` (si está presente) y lee la configuración del entorno.
    pub fn from_env() -> Result<Self> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Versión parametrizable para pruebas: `lookup` resuelve cada clave.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut s = Settings::default();
        if let Some(bind) = get("CATALOGO_BIND") {
            s.bind = bind;
        }
        s.data_dir = resolve_data_dir(get("CATALOGO_DATA_DIR"));
        if let Some(f) = get("CATALOGO_DATA_FILE") {
            s.data_file = f;
        }
        if let Some(f) = get("CATALOGO_BLACKLIST_FILE") {
            s.blacklist_file = f;
        }
        if let Some(f) = get("CATALOGO_LINKS_FILE") {
            s.links_file = f;
        }

        if let Some(v) = get("CATALOGO_MIN_HOURS") {
            let hours: f64 = parse_value("CATALOGO_MIN_HOURS", &v)?;
            if !hours.is_finite() || hours < 0.0 {
                return Err(config_error("CATALOGO_MIN_HOURS", &v));
            }
            s.min_hours = hours;
        }
        if let Some(v) = get("CATALOGO_FUZZY_THRESHOLD") {
            let t: f64 = parse_value("CATALOGO_FUZZY_THRESHOLD", &v)?;
            if !(0.0..=1.0).contains(&t) {
                return Err(config_error("CATALOGO_FUZZY_THRESHOLD", &v));
            }
            s.fuzzy_threshold = t;
        }
        if let Some(v) = get("CATALOGO_DEBOUNCE_MS") {
            let ms: u64 = parse_value("CATALOGO_DEBOUNCE_MS", &v)?;
            s.debounce = Duration::from_millis(ms);
        }

        Ok(s)
    }

    pub fn data_path(&self) -> PathBuf {
        self.data_dir.join(&self.data_file)
    }

    pub fn blacklist_path(&self) -> PathBuf {
        self.data_dir.join(&self.blacklist_file)
    }

    pub fn links_path(&self) -> PathBuf {
        self.data_dir.join(&self.links_file)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| config_error(key, value))
}

fn config_error(key: &str, value: &str) -> CatalogError {
    CatalogError::Config {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Resuelve el directorio con `data.json` y las listas auxiliares.
///
/// Orden: ruta explícita (si existe), `./data`, `./datafiles`, y por último
/// el propio directorio de trabajo.
pub fn resolve_data_dir(explicit: Option<String>) -> PathBuf {
    if let Some(path) = explicit {
        let p = PathBuf::from(&path);
        if p.is_dir() {
            tracing::debug!("usando CATALOGO_DATA_DIR: {:?}", p);
            return p;
        }
        tracing::warn!("CATALOGO_DATA_DIR={} no es un directorio, se busca en el CWD", path);
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    for candidate in [cwd.join("data"), cwd.join("datafiles")] {
        if candidate.is_dir() {
            tracing::debug!("datos encontrados en {:?}", candidate);
            return candidate;
        }
    }
    cwd
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_defaults_when_env_is_empty() {
        let s = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(s.bind, DEFAULT_BIND);
        assert_eq!(s.min_hours, 360.0);
        assert_eq!(s.fuzzy_threshold, 0.35);
        assert_eq!(s.debounce, Duration::from_millis(180));
        assert!(s.data_path().ends_with("data.json"));
    }

    #[test]
    fn test_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_string_lossy().to_string();
        let s = Settings::from_lookup(lookup_from(&[
            ("CATALOGO_DATA_DIR", dir_str.as_str()),
            ("CATALOGO_MIN_HOURS", "420"),
            ("CATALOGO_FUZZY_THRESHOLD", " 0.2 "),
            ("CATALOGO_DEBOUNCE_MS", "50"),
            ("CATALOGO_DATA_FILE", "cursos.json"),
        ]))
        .unwrap();
        assert_eq!(s.data_dir, dir.path());
        assert_eq!(s.min_hours, 420.0);
        assert_eq!(s.fuzzy_threshold, 0.2);
        assert_eq!(s.debounce, Duration::from_millis(50));
        assert_eq!(s.data_path(), dir.path().join("cursos.json"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = Settings::from_lookup(lookup_from(&[("CATALOGO_MIN_HOURS", "muchas")]));
        assert!(matches!(err, Err(CatalogError::Config { .. })));

        let err = Settings::from_lookup(lookup_from(&[("CATALOGO_FUZZY_THRESHOLD", "1.5")]));
        assert!(matches!(err, Err(CatalogError::Config { .. })));
    }
}
