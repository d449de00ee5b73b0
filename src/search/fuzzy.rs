//! Índice difuso ponderado sobre los campos `*_normal` del catálogo.
//!
//! La coincidencia es aproximada (distancia de edición por palabra, con
//! transposiciones), independiente de la posición dentro del campo e
//! insensible a acentos y mayúsculas porque se indexan las formas plegadas.
//! Cada palabra de la consulta tolera `floor(threshold * largo)` errores.
//! Si las opciones no son válidas, `build_index` devuelve el buscador por
//! subcadena sobre `normalizado` e `instituicao`.

use std::collections::HashMap;
use std::fmt::Debug;

use crate::error::{CatalogError, Result};
use crate::models::{Registro, DERIVED_KEYS};
use crate::text::fold_lower;

/// Buscador intercambiable. Devuelve índices de registros, del más al
/// menos relevante.
pub trait FuzzyMatcher: Send + Sync + Debug {
    fn search(&self, query: &str) -> Vec<usize>;
    fn kind(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeight {
    pub field: &'static str,
    pub weight: f64,
}

pub const DEFAULT_WEIGHTS: &[FieldWeight] = &[
    FieldWeight { field: "curso_normal", weight: 0.95 },
    FieldWeight { field: "denominacao_normal", weight: 0.9 },
    FieldWeight { field: "normalizado_normal", weight: 0.85 },
    FieldWeight { field: "instituicao_normal", weight: 0.6 },
    FieldWeight { field: "cidade_normal", weight: 0.3 },
    FieldWeight { field: "uf_normal", weight: 0.2 },
    FieldWeight { field: "_searchText", weight: 0.8 },
];

#[derive(Debug, Clone, PartialEq)]
pub struct IndexOptions {
    pub weights: Vec<FieldWeight>,
    /// Proporción de errores tolerada respecto del largo de la consulta
    /// (0 = sólo contención exacta).
    pub threshold: f64,
}

impl Default for IndexOptions {
    fn default() -> Self {
        IndexOptions {
            weights: DEFAULT_WEIGHTS.to_vec(),
            threshold: crate::config::DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

impl IndexOptions {
    pub fn with_threshold(threshold: f64) -> Self {
        IndexOptions {
            threshold,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(CatalogError::IndexOptions(format!(
                "threshold fuera de rango: {}",
                self.threshold
            )));
        }
        if self.weights.is_empty() {
            return Err(CatalogError::IndexOptions("sin campos para indexar".to_string()));
        }
        for w in &self.weights {
            if !DERIVED_KEYS.contains(&w.field) {
                return Err(CatalogError::IndexOptions(format!("campo no indexable: {}", w.field)));
            }
            if !w.weight.is_finite() || w.weight <= 0.0 {
                return Err(CatalogError::IndexOptions(format!(
                    "peso inválido para {}: {}",
                    w.field, w.weight
                )));
            }
        }
        Ok(())
    }
}

/// Un campo indexado: texto plegado y sus palabras como ids del
/// vocabulario del índice.
#[derive(Debug)]
struct IndexedField {
    text: String,
    words: Vec<u32>,
}

/// Índice ponderado. Cada campo se tokeniza una sola vez al construir; las
/// palabras distintas de todo el catálogo forman el vocabulario, y una
/// consulta compara cada una de sus palabras contra el vocabulario (no
/// contra cada registro).
#[derive(Debug)]
pub struct WeightedIndex {
    vocab: Vec<String>,
    docs: Vec<Vec<IndexedField>>,
    weights: Vec<f64>,
    threshold: f64,
}

impl WeightedIndex {
    pub fn new(records: &[Registro], options: &IndexOptions) -> Result<Self> {
        options.validate()?;
        let mut vocab: Vec<String> = Vec::new();
        let mut ids: HashMap<String, u32> = HashMap::new();
        let mut docs = Vec::with_capacity(records.len());
        for r in records {
            let mut fields = Vec::with_capacity(options.weights.len());
            for w in &options.weights {
                let text = r.field(w.field).to_string();
                let words = text
                    .split_whitespace()
                    .map(|word| match ids.get(word) {
                        Some(&id) => id,
                        None => {
                            let id = vocab.len() as u32;
                            vocab.push(word.to_string());
                            ids.insert(word.to_string(), id);
                            id
                        }
                    })
                    .collect();
                fields.push(IndexedField { text, words });
            }
            docs.push(fields);
        }
        Ok(WeightedIndex {
            vocab,
            docs,
            weights: options.weights.iter().map(|w| w.weight).collect(),
            threshold: options.threshold,
        })
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn vocab_len(&self) -> usize {
        self.vocab.len()
    }

    /// Para cada palabra de la consulta, la distancia a cada palabra del
    /// vocabulario (`None` si supera lo tolerado para esa palabra).
    fn word_table(&self, qwords: &[&str]) -> Vec<Vec<Option<u8>>> {
        qwords
            .iter()
            .map(|qw| {
                let qlen = qw.chars().count();
                let allowed = (self.threshold * qlen as f64).floor() as usize;
                self.vocab
                    .iter()
                    .map(|w| word_distance(qw, qlen, w, allowed).map(|d| d.min(u8::MAX as usize) as u8))
                    .collect()
            })
            .collect()
    }
}

/// Distancia de edición (con transposiciones) entre una palabra de la
/// consulta y una del vocabulario, o su prefijo del mismo largo.
fn word_distance(qw: &str, qlen: usize, word: &str, allowed: usize) -> Option<usize> {
    if word.starts_with(qw) {
        return Some(0);
    }
    if allowed == 0 {
        return None;
    }
    let wlen = word.chars().count();
    let mut best: Option<usize> = None;
    if wlen.abs_diff(qlen) <= allowed {
        best = Some(strsim::osa_distance(qw, word));
    }
    if wlen > qlen {
        let cut = word.char_indices().nth(qlen).map_or(word.len(), |(i, _)| i);
        let d = strsim::osa_distance(qw, &word[..cut]);
        best = Some(best.map_or(d, |b| b.min(d)));
    }
    best.filter(|&d| d <= allowed)
}

/// Distancia del campo a la consulta: 0 si la contiene; si no, la suma de
/// la mejor distancia de cada palabra de la consulta a alguna palabra del
/// campo. `None` si alguna palabra no encuentra pareja.
fn field_distance(field: &IndexedField, q: &str, table: Option<&[Vec<Option<u8>>]>) -> Option<usize> {
    if field.text.is_empty() {
        return None;
    }
    if field.text.contains(q) {
        return Some(0);
    }
    let table = table?;
    let mut total = 0;
    for per_word in table {
        let best = field
            .words
            .iter()
            .filter_map(|&id| per_word[id as usize])
            .min()?;
        total += best as usize;
    }
    Some(total)
}

impl FuzzyMatcher for WeightedIndex {
    fn search(&self, query: &str) -> Vec<usize> {
        let q = fold_lower(query);
        let qlen = q.chars().count();
        if qlen == 0 {
            return Vec::new();
        }
        let qwords: Vec<&str> = q.split_whitespace().collect();
        // umbral 0: sólo contención exacta
        let table = (self.threshold > 0.0).then(|| self.word_table(&qwords));

        let mut scored: Vec<(usize, f64)> = Vec::new();
        for (i, fields) in self.docs.iter().enumerate() {
            let mut best: Option<f64> = None;
            for (field, weight) in fields.iter().zip(&self.weights) {
                if let Some(dist) = field_distance(field, &q, table.as_deref()) {
                    let score = weight * (1.0 - dist as f64 / qlen as f64);
                    best = Some(best.map_or(score, |b: f64| b.max(score)));
                }
            }
            if let Some(score) = best {
                scored.push((i, score));
            }
        }
        // sort_by es estable: a igual puntaje se conserva el orden del catálogo
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.into_iter().map(|(i, _)| i).collect()
    }

    fn kind(&self) -> &'static str {
        "fuzzy"
    }
}

/// Buscador mínimo: subcadena sin distinción de mayúsculas sobre el nombre
/// oficial del curso y la institución.
#[derive(Debug)]
pub struct SubstringIndex {
    docs: Vec<(String, String)>,
}

impl SubstringIndex {
    pub fn new(records: &[Registro]) -> Self {
        SubstringIndex {
            docs: records
                .iter()
                .map(|r| (r.normalizado.to_lowercase(), r.instituicao.to_lowercase()))
                .collect(),
        }
    }
}

impl FuzzyMatcher for SubstringIndex {
    fn search(&self, query: &str) -> Vec<usize> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }
        self.docs
            .iter()
            .enumerate()
            .filter(|(_, (name, inst))| name.contains(&q) || inst.contains(&q))
            .map(|(i, _)| i)
            .collect()
    }

    fn kind(&self) -> &'static str {
        "substring"
    }
}

/// Construye el índice ponderado; si falla, registra el problema y usa
/// `SubstringIndex`.
pub fn build_index(records: &[Registro], options: &IndexOptions) -> Box<dyn FuzzyMatcher> {
    match WeightedIndex::new(records, options) {
        Ok(index) => {
            tracing::info!(
                "índice difuso construido: {} registros, {} palabras",
                index.len(),
                index.vocab_len()
            );
            Box::new(index)
        }
        Err(e) => {
            tracing::warn!("{}; se usa búsqueda por subcadena", e);
            Box::new(SubstringIndex::new(records))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::enrich::enrich_records;
    use serde_json::json;

    fn sample() -> Vec<Registro> {
        enrich_records(&json!([
            {"curso": "Engenharia Civil", "instituicao": "Universidade Federal do Rio", "cidade": "Niterói", "uf": "RJ"},
            {"curso": "Psicopedagogia Clínica", "instituicao": "Faculdade Paulista", "cidade": "Campinas", "uf": "SP"},
            {"curso": "Gestão Ambiental", "instituicao": "Centro Universitário Sul", "uf": "RS"}
        ]))
    }

    #[test]
    fn test_accent_insensitive_containment() {
        let idx = WeightedIndex::new(&sample(), &IndexOptions::default()).unwrap();
        assert_eq!(idx.search("GESTÃO"), vec![2]);
        assert_eq!(idx.search("niteroi"), vec![0]);
        assert!(idx.search("   ").is_empty());
    }

    #[test]
    fn test_tolerates_typos() {
        let idx = WeightedIndex::new(&sample(), &IndexOptions::default()).unwrap();
        assert_eq!(idx.search("psicopedagojia"), vec![1]);
        assert_eq!(idx.search("engenhraia"), vec![0]);
        assert!(idx.search("zzzzzzzz").is_empty());
    }

    #[test]
    fn test_words_match_in_any_position() {
        let idx = WeightedIndex::new(&sample(), &IndexOptions::default()).unwrap();
        assert_eq!(idx.search("clinca psicopedagojia"), vec![1]);
        assert_eq!(idx.search("Engenharia   Civil"), vec![0]);
        // prefijo de palabra con un error
        assert_eq!(idx.search("psicopedagoj"), vec![1]);
    }

    #[test]
    fn test_vocabulary_is_shared() {
        let records = enrich_records(&json!([
            {"curso": "Direito", "instituicao": "Faculdade Direito"},
            {"curso": "Direito", "instituicao": "Faculdade Norte"}
        ]));
        let idx = WeightedIndex::new(&records, &IndexOptions::default()).unwrap();
        // direito, faculdade, norte
        assert_eq!(idx.vocab_len(), 3);
    }

    #[test]
    fn test_zero_threshold_is_exact() {
        let idx = WeightedIndex::new(&sample(), &IndexOptions::with_threshold(0.0)).unwrap();
        assert!(idx.search("engenhraia").is_empty());
        assert_eq!(idx.search("civil"), vec![0]);
    }

    #[test]
    fn test_weights_rank_course_over_city() {
        let records = enrich_records(&json!([
            {"curso": "Administração", "cidade": "Campinas"},
            {"curso": "Campinas Digital", "cidade": "Sorocaba"}
        ]));
        let idx = WeightedIndex::new(&records, &IndexOptions::default()).unwrap();
        assert_eq!(idx.search("campinas"), vec![1, 0]);
    }

    #[test]
    fn test_invalid_options_fall_back_to_substring() {
        let records = sample();
        let bad = IndexOptions::with_threshold(2.0);
        assert!(matches!(bad.validate(), Err(CatalogError::IndexOptions(_))));
        let idx = build_index(&records, &bad);
        assert_eq!(idx.kind(), "substring");

        let unknown = IndexOptions {
            weights: vec![FieldWeight { field: "curso", weight: 1.0 }],
            threshold: 0.3,
        };
        assert!(unknown.validate().is_err());
        assert_eq!(build_index(&records, &IndexOptions::default()).kind(), "fuzzy");
    }

    #[test]
    fn test_substring_index() {
        let records = enrich_records(&json!([
            {"normalizado": "ENGENHARIA CIVIL", "instituicao": "UFRJ"},
            {"normalizado": "DIREITO", "instituicao": "PUC Minas"}
        ]));
        let idx = SubstringIndex::new(&records);
        assert_eq!(idx.search("civil"), vec![0]);
        assert_eq!(idx.search("minas"), vec![1]);
        assert!(idx.search("").is_empty());
    }
}
