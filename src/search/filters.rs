/// Filtros que se aplican después de la búsqueda de texto.
///
/// Cada filtro recibe la lista de índices que dejó la etapa anterior y
/// devuelve los que sobreviven, sin alterar el orden.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::enrich::split_ufs;
use crate::models::fields::{HOURS, INSTITUTION_NAME};
use crate::models::Registro;
use crate::search::exclusion::{is_excluded, Blacklist};

static FIRST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+(\.\d+)?").unwrap());

/// Extrae el primer número de una carga horaria ("480 h", "360,5", "360h").
/// `None` si no hay número legible.
pub fn parse_hours(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    let cleaned = cleaned.replacen(',', ".", 1);
    let m = FIRST_NUMBER.find(&cleaned)?;
    m.as_str().parse::<f64>().ok()
}

/// Se conserva si la carga no se puede leer o es >= `min_hours`.
pub fn passes_hour_floor(record: &Registro, min_hours: f64) -> bool {
    match parse_hours(record.first_of(HOURS)) {
        None => true,
        Some(h) => h >= min_hours,
    }
}

pub fn matches_region(record: &Registro, uf: &str) -> bool {
    let target = uf.trim().to_uppercase();
    split_ufs(&record.uf).any(|p| p.to_uppercase() == target)
}

pub fn matches_institution(record: &Registro, filter: &str) -> bool {
    record
        .first_of(INSTITUTION_NAME)
        .to_lowercase()
        .contains(&filter.trim().to_lowercase())
}

/// Parámetros de los filtros posteriores al texto.
#[derive(Debug, Clone, Copy)]
pub struct FilterParams<'a> {
    pub blacklist: &'a Blacklist,
    pub min_hours: f64,
    pub uf: &'a str,
    pub instituicao: &'a str,
}

/// Aplica exclusión, piso de horas, UF e institución, en ese orden.
pub fn apply_all_filters(records: &[Registro], ids: Vec<usize>, params: &FilterParams) -> Vec<usize> {
    let mut resultado = ids;

    // Filtro 1: lista de exclusión
    if !params.blacklist.is_empty() {
        resultado.retain(|&i| !is_excluded(&records[i], params.blacklist));
    }

    // Filtro 2: piso de carga horaria
    let antes = resultado.len();
    resultado.retain(|&i| passes_hour_floor(&records[i], params.min_hours));
    tracing::debug!(
        "filtro de carga (>= {}): antes={} después={}",
        params.min_hours,
        antes,
        resultado.len()
    );

    // Filtro 3: UF
    if !params.uf.trim().is_empty() {
        resultado.retain(|&i| matches_region(&records[i], params.uf));
    }

    // Filtro 4: institución
    if !params.instituicao.trim().is_empty() {
        resultado.retain(|&i| matches_institution(&records[i], params.instituicao));
    }

    resultado
}
