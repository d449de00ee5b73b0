use crate::models::UfCount;

/// Código de marcador para registros sin UF real; no se lista en el índice
/// de regiones.
pub const PLACEHOLDER_UF: &str = "ZZ";

/// Conteo de referencia por UF publicado junto al catálogo. Sólo para
/// mostrar; no interviene en los filtros.
pub const REFERENCE_UFS: &[(&str, usize)] = &[
    ("AC", 30),
    ("AL", 157),
    ("AM", 96),
    ("AP", 23),
    ("BA", 297),
    ("CE", 293),
    ("DF", 336),
    ("ES", 271),
    ("GO", 392),
    ("MA", 88),
    ("MG", 1378),
    ("MS", 130),
    ("MT", 71),
    ("PA", 183),
    ("PB", 223),
    ("PE", 355),
    ("PI", 99),
    ("PR", 883),
    ("RJ", 765),
    ("RN", 147),
    ("RO", 161),
    ("RR", 129),
    ("RS", 683),
    ("SC", 231),
    ("SE", 126),
    ("SP", 1644),
    ("TO", 60),
];

/// Entradas del índice de regiones (sin `ZZ`).
pub fn toc_regions(ufs: &[UfCount]) -> Vec<&UfCount> {
    ufs.iter()
        .filter(|u| !u.uf.trim().eq_ignore_ascii_case(PLACEHOLDER_UF))
        .collect()
}
