use once_cell::sync::Lazy;
use regex::Regex;

use super::fold_upper;

// Sufijos de volumen/nivel que se quitan del final del título, en el orden
// en que se prueban dentro de cada pasada. El grupo 1 (si existe) es el
// token numérico que se valida con `is_suffix_token`.
static SUFFIX_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // "- MODULO I", "/ PARTE 2", ": NIVEL B"
        r"\s*[-\u{2013}\u{2014}:/]\s*(?:MODULO|MOD|PARTE|NIVEL|EDICAO|VOLUME|VOL|TURMA|SERIE|ANO)\b[\s\-:]*([IVXLCDM]+|\d{1,3}|[A-Z])\s*$",
        // "(I)", "(MODULO II)"
        r"\s*\(\s*(?:MODULO|MOD|PARTE|NIVEL|EDICAO|VOLUME|TURMA|SERIE)?\s*([IVXLCDM]+|\d{1,3}|[A-Z])\s*\)\s*$",
        // romano aislado
        r"\s*\b([IVXLCDM]{1,5})\b\s*$",
        // número aislado
        r"\s*\b(\d{1,3})\b\s*$",
        // letra aislada ("DISFAGIA H")
        r"\s*\b([A-Z])\b\s*$",
        // separador + token ("- II", "/ 3")
        r"\s*[-\u{2013}\u{2014}:/]\s*([IVXLCDM]+|\d{1,3}|[A-Z])\s*$",
        // "OU" residual
        r"\s*\bOU\b\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

// Romanos "de volumen" (I..XXXIX). Evita tratar palabras como CIVIL o MIX
// como numerales.
static SMALL_ROMAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^X{0,3}(?:IX|IV|V?I{0,3})$").unwrap());

static TRAILING_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-:/().]+$").unwrap());

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Normaliza un título de curso para agrupar variantes.
///
/// Quita acentos, pasa a MAYÚSCULAS y elimina iterativamente los sufijos de
/// módulo/parte/nivel, romanos, números cortos, letras sueltas y un "OU"
/// final, hasta que una pasada no cambia nada. Si el resultado queda vacío
/// se devuelve la forma plegada sin recortar.
///
/// ```
/// use catalogo::text::normalize_course_title;
/// assert_eq!(normalize_course_title("Curso de Libras - Módulo II"), "CURSO DE LIBRAS");
/// ```
pub fn normalize_course_title(raw: &str) -> String {
    let base = raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let plain = fold_upper(base);

    let mut t = plain.clone();
    loop {
        let prev = t.clone();
        for re in SUFFIX_PATTERNS.iter() {
            if let Some(stripped) = strip_suffix(&t, re) {
                t = stripped;
            }
        }
        t = TRAILING_PUNCT.replace(&t, "").trim().to_string();
        if t == prev || t.is_empty() {
            break;
        }
    }

    let t = WHITESPACE_RUN.replace_all(&t, " ").trim().to_string();
    if t.is_empty() { plain } else { t }
}

fn strip_suffix(t: &str, re: &Regex) -> Option<String> {
    let caps = re.captures(t)?;
    if let Some(token) = caps.get(1) {
        if !is_suffix_token(token.as_str()) {
            return None;
        }
    }
    let start = caps.get(0)?.start();
    Some(t[..start].trim().to_string())
}

fn is_suffix_token(token: &str) -> bool {
    token.chars().count() == 1
        || token.chars().all(|c| c.is_ascii_digit())
        || SMALL_ROMAN.is_match(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_suffix() {
        assert_eq!(normalize_course_title("CURSO DE LIBRAS - MODULO II"), "CURSO DE LIBRAS");
        assert_eq!(normalize_course_title("Curso de Libras – Módulo 3"), "CURSO DE LIBRAS");
        assert_eq!(normalize_course_title("GESTAO / PARTE B"), "GESTAO");
    }

    #[test]
    fn test_single_letter_suffix() {
        assert_eq!(normalize_course_title("PRIMEIROS SOCORROS H"), "PRIMEIROS SOCORROS");
        assert_eq!(normalize_course_title("DISFAGIA H."), "DISFAGIA");
    }

    #[test]
    fn test_parenthetical_and_numbers() {
        assert_eq!(normalize_course_title("Docência no Ensino Superior (II)"), "DOCENCIA NO ENSINO SUPERIOR");
        assert_eq!(normalize_course_title("Docência (Modulo 2)"), "DOCENCIA");
        assert_eq!(normalize_course_title("MBA EM FINANÇAS 12"), "MBA EM FINANCAS");
        assert_eq!(normalize_course_title("HISTORIA 2024"), "HISTORIA 2024");
    }

    #[test]
    fn test_multiple_passes() {
        // "- II" primero, luego "- MODULO I", luego la "X" suelta
        assert_eq!(normalize_course_title("CURSO X - MODULO I - II"), "CURSO");
        assert_eq!(normalize_course_title("ENFERMAGEM DO TRABALHO OU"), "ENFERMAGEM DO TRABALHO");
    }

    #[test]
    fn test_words_made_of_roman_letters_are_kept() {
        assert_eq!(normalize_course_title("ENGENHARIA CIVIL"), "ENGENHARIA CIVIL");
        assert_eq!(normalize_course_title("ENGENHARIA CIVIL II"), "ENGENHARIA CIVIL");
        assert_eq!(normalize_course_title("DIREITO - CIVIL"), "DIREITO - CIVIL");
    }

    #[test]
    fn test_fallback_when_everything_is_stripped() {
        assert_eq!(normalize_course_title("II"), "II");
        assert_eq!(normalize_course_title("\u{feff} a "), "A");
        assert_eq!(normalize_course_title("   "), "");
        assert_eq!(normalize_course_title(""), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "CURSO DE LIBRAS - MODULO II",
            "PRIMEIROS SOCORROS H",
            "Gestão   em  Saúde  (Turma 3)",
            "CURSO X - MODULO I - II",
            "II",
            "I  V",
            "Neuropsicopedagogia - Vol. 2",
            "ÁREA   DE   ESTUDOS   OU",
            "",
        ];
        for s in samples {
            let once = normalize_course_title(s);
            assert_eq!(normalize_course_title(&once), once, "no idempotente para {:?}", s);
        }
    }
}
