//! Normalización de texto.
//!
//! - `fold_accents` / `fold_lower`: formas sin diacríticos para indexar y buscar.
//! - `normalize_course_title`: forma canónica en MAYÚSCULAS para agrupar.
//! - `to_title_case`: forma cosmética para mostrar.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

mod title;

pub use title::normalize_course_title;

/// Descompone (NFD), quita las marcas diacríticas y recorta espacios.
pub fn fold_accents(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// `fold_accents` en minúsculas; forma de los campos `*_normal`.
pub fn fold_lower(s: &str) -> String {
    fold_accents(s).to_lowercase()
}

/// `fold_accents` en MAYÚSCULAS. Se vuelve a plegar después de convertir
/// porque algunas mayúsculas se descomponen en letra + marca.
pub fn fold_upper(s: &str) -> String {
    fold_accents(&fold_accents(s).to_uppercase())
}

/// Sólo letras y dígitos ASCII, en MAYÚSCULAS ("U.F.R.J." -> "UFRJ").
pub fn alnum_upper(s: &str) -> String {
    fold_upper(s)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Comparación al estilo `localeCompare(.., {sensitivity: 'base'})`:
/// ignora mayúsculas y acentos.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    fold_lower(a).cmp(&fold_lower(b))
}

/// Minúsculas y luego mayúscula inicial en cada palabra. Guiones, en-dash
/// y em-dash separan partes que también se capitalizan ("uni-an" -> "Uni-An").
pub fn to_title_case(s: &str) -> String {
    let lowered = s.nfc().collect::<String>().to_lowercase();
    lowered
        .split_whitespace()
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut at_start = true;
    for c in word.chars() {
        if matches!(c, '-' | '\u{2013}' | '\u{2014}') {
            out.push(c);
            at_start = true;
        } else if at_start {
            out.extend(c.to_uppercase());
            at_start = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_accents() {
        assert_eq!(fold_accents("  Educação Física "), "Educacao Fisica");
        assert_eq!(fold_lower("SÃO PAULO"), "sao paulo");
        assert_eq!(fold_upper("gestão"), "GESTAO");
    }

    #[test]
    fn test_alnum_upper() {
        assert_eq!(alnum_upper("U.F.R.J."), "UFRJ");
        assert_eq!(alnum_upper("Pós-graduação 2"), "POSGRADUACAO2");
        assert_eq!(alnum_upper(" - "), "");
    }

    #[test]
    fn test_locale_cmp_ignores_case_and_accents() {
        assert_eq!(locale_cmp("Álgebra", "algebra"), Ordering::Equal);
        assert_eq!(locale_cmp("ética", "Fisica"), Ordering::Less);
        assert_eq!(locale_cmp("Zoologia", "árvore"), Ordering::Greater);
    }

    #[test]
    fn test_to_title_case() {
        assert_eq!(to_title_case("uni-an"), "Uni-An");
        assert_eq!(to_title_case("  CURSO   de  DIREITO "), "Curso De Direito");
        assert_eq!(to_title_case("centro universitário–sul"), "Centro Universitário–Sul");
        assert_eq!(to_title_case(""), "");
    }
}
