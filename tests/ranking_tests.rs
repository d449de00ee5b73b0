use catalogo::catalog::enrich_records;
use catalogo::ranking::{compute_top, COURSES_PER_INSTITUTION, DEFAULT_TOP_COURSES};
use serde_json::json;

#[test]
fn test_top_report_from_catalog() {
    let records = enrich_records(&json!([
        {"instituicao": "Universidade A", "normalizado": "DIREITO", "uf": "SP"},
        {"instituicao": "Universidade A", "normalizado": "DIREITO II", "uf": "RJ"},
        {"instituicao": "Universidade A", "normalizado": "LETRAS", "uf": "SP"},
        {"instituicao": "Faculdade B", "normalizado_display": "Direito Penal", "normalizado": "DIREITO PENAL", "uf": "MG"},
        {"instituicao": "Faculdade B", "normalizado": "DIREITO", "estado": "BA"},
        {"instituicao": "", "normalizado": "DIREITO", "uf": "AM"}
    ]));
    let report = compute_top(&records, 10);

    assert_eq!(report.top.len(), 2);
    assert_eq!(report.top[0].name, "Universidade A");
    assert_eq!(report.top[0].total_records, 3);
    assert_eq!(report.top[0].courses[0].key, "DIREITO");
    assert_eq!(report.top[0].courses[0].regions, vec!["RJ", "SP"]);

    let b = &report.top[1];
    let penal = b.courses.iter().find(|c| c.key == "DIREITO PENAL").unwrap();
    assert_eq!(penal.canonical, "Direito Penal");

    // DIREITO: SP, RJ (A) y BA (B); el registro sin institución no cuenta
    let direito = report.global_course_ranking.iter().find(|c| c.key == "DIREITO").unwrap();
    assert_eq!(direito.region_count, 3);
    assert_eq!(report.global_course_ranking[0].key, "DIREITO");

    let view = report.truncated(COURSES_PER_INSTITUTION, DEFAULT_TOP_COURSES);
    assert!(view.global_course_ranking.len() <= DEFAULT_TOP_COURSES);
}
