//! Búsqueda prioritaria por sigla de institución ("UFRJ", "PUC", ...).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::fields::INSTITUTION_IDENTIFIERS;
use crate::models::Registro;
use crate::text::{alnum_upper, fold_upper};

static PARENTHESIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]+)\)").unwrap());

/// Consulta sin espacios, si parece una sigla: 2 a 10 letras/dígitos ASCII.
pub fn as_acronym(query: &str) -> Option<String> {
    let compact: String = query.chars().filter(|c| !c.is_whitespace()).collect();
    let len = compact.chars().count();
    if (2..=10).contains(&len) && compact.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(compact)
    } else {
        None
    }
}

fn loosely_equal(candidate: &str, q: &str) -> bool {
    !candidate.is_empty() && (candidate == q || candidate.contains(q) || q.contains(candidate))
}

/// `true` si algún identificador de la institución del registro coincide
/// con la sigla normalizada `q` (sólo A-Z0-9).
pub fn matches_acronym(record: &Registro, q: &str) -> bool {
    INSTITUTION_IDENTIFIERS.iter().any(|key| {
        let raw = record.field(key);
        if raw.is_empty() {
            return false;
        }
        if loosely_equal(&alnum_upper(raw), q) {
            return true;
        }
        if PARENTHESIZED
            .captures_iter(raw)
            .any(|c| loosely_equal(&alnum_upper(&c[1]), q))
        {
            return true;
        }
        fold_upper(raw)
            .split(|c: char| !c.is_ascii_alphanumeric())
            .any(|tok| tok == q)
    })
}

/// Registros cuya institución coincide con la consulta tratada como sigla.
/// Vacío si la consulta no parece una sigla.
pub fn acronym_matches(records: &[Registro], query: &str) -> Vec<usize> {
    let Some(compact) = as_acronym(query) else {
        return Vec::new();
    };
    let q = alnum_upper(&compact);
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| matches_acronym(r, &q))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inst(sigla: &str, instituicao: &str) -> Registro {
        Registro {
            sigla: sigla.to_string(),
            instituicao: instituicao.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_as_acronym() {
        assert_eq!(as_acronym("ufrj"), Some("ufrj".to_string()));
        assert_eq!(as_acronym(" u f r j "), Some("ufrj".to_string()));
        assert_eq!(as_acronym("a"), None);
        assert_eq!(as_acronym("engenharia civil"), None);
        assert_eq!(as_acronym("UFRJ-RJ"), None);
        assert_eq!(as_acronym("é"), None);
    }

    #[test]
    fn test_matches_by_sigla_and_parenthetical() {
        let records = vec![
            inst("UFRJ", "Universidade Federal do Rio de Janeiro"),
            inst("", "Pontifícia Universidade Católica (PUC-Rio)"),
            inst("", "Centro Universitário Sul"),
            inst("U.F.M.G.", ""),
        ];
        assert_eq!(acronym_matches(&records, "ufrj"), vec![0]);
        assert_eq!(acronym_matches(&records, "PUC"), vec![1]);
        assert_eq!(acronym_matches(&records, "ufmg"), vec![3]);
        assert!(acronym_matches(&records, "xyz").is_empty());
    }

    #[test]
    fn test_token_match_in_extras() {
        let mut r = Registro::default();
        r.extras.insert("razao_social".to_string(), "Associação UNIP Ltda".to_string());
        assert!(matches_acronym(&r, "UNIP"));
        assert!(!matches_acronym(&r, "USP"));
    }
}
