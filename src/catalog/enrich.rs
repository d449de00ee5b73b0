//! Enriquecimiento de registros crudos (`data.json`).
//!
//! Convierte cada objeto JSON en un `Registro` con todos los campos como
//! texto, la carga horaria en forma "<n> h", los campos `*_normal` y el
//! blob `_searchText`.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::models::fields::COURSE_NAME;
use crate::models::{Registro, UfCount, DERIVED_KEYS};
use crate::text::{fold_lower, locale_cmp};

static HOURS_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bhoras?\b").unwrap());
static HRS_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bhrs?\b").unwrap());
static GLUED_H: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d)h\b").unwrap());
static ONLY_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());
static H_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bh\b").unwrap());

/// Campos con tipo propio en `Registro`.
const TYPED_KEYS: &[&str] = &[
    "id",
    "curso",
    "denominacao",
    "normalizado",
    "normalizado_display",
    "instituicao",
    "sigla",
    "cidade",
    "uf",
    "modalidade",
    "carga_horaria",
    "vagas",
    "coordenador",
];

/// Convierte un valor JSON a texto. `null` y objetos => "", números y
/// booleanos con su forma JSON, arreglos unidos por coma.
pub fn coerce(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items.iter().map(coerce).collect::<Vec<_>>().join(","),
        Value::Object(_) => String::new(),
    }
}

/// Unifica la unidad de la carga horaria: "300 horas" -> "300 h",
/// "480h" -> "480 h", "360" -> "360 h". No toca el número.
pub fn canonicalize_hours(raw: &str) -> String {
    let mut ch = raw.trim().to_string();
    if ch.is_empty() {
        return ch;
    }
    ch = HOURS_WORD.replacen(&ch, 1, "h").into_owned();
    ch = HRS_WORD.replacen(&ch, 1, "h").into_owned();
    ch = GLUED_H.replacen(&ch, 1, "${1} h").into_owned();
    if ONLY_DIGITS.is_match(&ch) {
        ch.push_str(" h");
    }
    if ch.chars().any(|c| c.is_ascii_digit()) && !H_TOKEN.is_match(&ch) {
        ch.push_str(" h");
    }
    ch.trim().to_string()
}

/// Enriquece un objeto crudo. Nunca falla: campos ausentes quedan vacíos.
pub fn enrich_record(raw: &Map<String, Value>) -> Registro {
    let get = |key: &str| raw.get(key).map(coerce).unwrap_or_default();

    let mut r = Registro {
        id: get("id"),
        curso: String::new(),
        denominacao: get("denominacao"),
        normalizado: get("normalizado"),
        normalizado_display: get("normalizado_display"),
        instituicao: get("instituicao"),
        sigla: get("sigla"),
        cidade: get("cidade"),
        uf: get("uf"),
        modalidade: get("modalidade"),
        carga_horaria: canonicalize_hours(&get("carga_horaria")),
        vagas: get("vagas"),
        coordenador: get("coordenador"),
        extras: extra_fields(raw),
        ..Default::default()
    };
    r.curso = COURSE_NAME
        .iter()
        .map(|&k| get(k))
        .find(|v| !v.is_empty())
        .unwrap_or_default();

    r.instituicao_normal = fold_lower(&r.instituicao);
    r.curso_normal = fold_lower(&r.curso);
    r.denominacao_normal = fold_lower(&r.denominacao);
    r.normalizado_normal = fold_lower(&r.normalizado);
    r.cidade_normal = fold_lower(&r.cidade);
    r.uf_normal = fold_lower(&r.uf);
    r.search_text = [
        r.instituicao_normal.as_str(),
        r.curso_normal.as_str(),
        r.denominacao_normal.as_str(),
        r.normalizado_normal.as_str(),
        r.cidade_normal.as_str(),
        r.uf_normal.as_str(),
    ]
    .join(" ")
    .trim()
    .to_string();
    r
}

fn extra_fields(raw: &Map<String, Value>) -> BTreeMap<String, String> {
    raw.iter()
        .filter(|(k, _)| !TYPED_KEYS.contains(&k.as_str()) && !DERIVED_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), coerce(v)))
        .filter(|(_, v)| !v.is_empty())
        .collect()
}

/// Enriquece la lista completa. Si la entrada no es un arreglo se registra
/// y se devuelve una lista vacía; los elementos que no son objetos se omiten.
pub fn enrich_records(raw: &Value) -> Vec<Registro> {
    let Some(items) = raw.as_array() else {
        tracing::warn!("catálogo sin arreglo de registros ({}), se usa lista vacía", kind_of(raw));
        return Vec::new();
    };

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match item.as_object() {
            Some(obj) => out.push(enrich_record(obj)),
            None => tracing::warn!("registro {} ignorado: se esperaba un objeto, llegó {}", i, kind_of(item)),
        }
    }
    out
}

pub(crate) fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "booleano",
        Value::Number(_) => "número",
        Value::String(_) => "texto",
        Value::Array(_) => "arreglo",
        Value::Object(_) => "objeto",
    }
}

/// Códigos de UF de un campo que puede traer varios separados por coma.
pub fn split_ufs(uf: &str) -> impl Iterator<Item = &str> {
    uf.split(',').map(str::trim).filter(|p| !p.is_empty())
}

/// Conteo de registros por UF, ordenado por código.
pub fn region_counts(records: &[Registro]) -> Vec<UfCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for r in records {
        for uf in split_ufs(&r.uf) {
            *counts.entry(uf).or_insert(0) += 1;
        }
    }
    let mut out: Vec<UfCount> = counts
        .into_iter()
        .map(|(uf, count)| UfCount { uf: uf.to_string(), count })
        .collect();
    out.sort_by(|a, b| locale_cmp(&a.uf, &b.uf).then_with(|| a.uf.cmp(&b.uf)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonicalize_hours() {
        assert_eq!(canonicalize_hours("300 horas"), "300 h");
        assert_eq!(canonicalize_hours("480h"), "480 h");
        assert_eq!(canonicalize_hours("360"), "360 h");
        assert_eq!(canonicalize_hours(" 420 Hrs "), "420 h");
        assert_eq!(canonicalize_hours("variável"), "variável");
        assert_eq!(canonicalize_hours("mínimo 360"), "mínimo 360 h");
        assert_eq!(canonicalize_hours(""), "");
    }

    #[test]
    fn test_enrich_record_fills_defaults() {
        let raw = json!({
            "denominacao": "Gestão Pública",
            "instituicao": "Universidade São Paulo",
            "uf": "SP",
            "carga_horaria": 360,
            "vagas": null,
            "codigo_curso": 77
        });
        let r = enrich_record(raw.as_object().unwrap());
        assert_eq!(r.curso, "Gestão Pública");
        assert_eq!(r.carga_horaria, "360 h");
        assert_eq!(r.vagas, "");
        assert_eq!(r.cidade, "");
        assert_eq!(r.curso_normal, "gestao publica");
        assert_eq!(r.instituicao_normal, "universidade sao paulo");
        assert_eq!(r.search_text, "universidade sao paulo gestao publica gestao publica   sp");
        assert_eq!(r.extras.get("codigo_curso").map(String::as_str), Some("77"));
    }

    #[test]
    fn test_enrich_ignores_incoming_derived_fields() {
        let raw = json!({"normalizado": "DIREITO", "_searchText": "lixo", "uf_normal": "xx"});
        let r = enrich_record(raw.as_object().unwrap());
        assert_eq!(r.search_text, "direito  direito");
        assert_eq!(r.uf_normal, "");
        assert!(r.extras.is_empty());
    }

    #[test]
    fn test_enrichment_is_idempotent() {
        let raw = json!({"curso": "Enfermagem", "instituicao": "UNI-AN", "carga_horaria": "480h", "sigla_instituicao": "UA"});
        let once = enrich_record(raw.as_object().unwrap());
        let again_raw = serde_json::to_value(&once).unwrap();
        let twice = enrich_record(again_raw.as_object().unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_enrich_records_tolerates_bad_input() {
        assert!(enrich_records(&Value::Null).is_empty());
        assert!(enrich_records(&json!({"curso": "x"})).is_empty());
        let out = enrich_records(&json!([{"curso": "A"}, 3, "texto", {"curso": "B"}]));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_region_counts() {
        let records = enrich_records(&json!([
            {"uf": "SP"}, {"uf": "rj, SP"}, {"uf": ""}, {"uf": "AC"}
        ]));
        let counts = region_counts(&records);
        let pairs: Vec<(&str, usize)> = counts.iter().map(|c| (c.uf.as_str(), c.count)).collect();
        assert_eq!(pairs, vec![("AC", 1), ("rj", 1), ("SP", 2)]);
        let total: usize = counts.iter().map(|c| c.count).sum();
        assert!(total >= records.iter().filter(|r| !r.uf.is_empty()).count());
    }
}
