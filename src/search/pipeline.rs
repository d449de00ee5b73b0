//! Flujo completo de una consulta: texto, exclusión, piso de horas, UF,
//! institución, agrupación y paginación, siempre en ese orden.

use crate::catalog::Catalogo;
use crate::config::DEFAULT_MIN_HOURS;
use crate::models::{FilterState, PageInfo, TitleGroup};
use crate::search::acronym::acronym_matches;
use crate::search::filters::{apply_all_filters, FilterParams};
use crate::search::grouping::group_by_title;
use crate::search::pagination::paginate_groups;
use crate::text::fold_lower;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    pub min_hours: f64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            min_hours: DEFAULT_MIN_HOURS,
        }
    }
}

#[derive(Debug)]
pub struct PipelineResult<'a> {
    /// Índices de todos los registros que pasaron los filtros, antes de
    /// agrupar (para exportar o contar).
    pub filtered: Vec<usize>,
    /// Grupos de la página actual, ya ordenados por título.
    pub groups: Vec<TitleGroup<'a>>,
    pub pagination: PageInfo,
}

/// Etapa de texto. Consulta vacía => todo el catálogo. Si no, prueba la
/// sigla; si no hay coincidencias, el índice difuso; si tampoco, subcadena
/// sobre `_searchText`.
pub fn text_query_stage(catalog: &Catalogo, query: &str) -> Vec<usize> {
    let q = query.trim();
    if q.is_empty() {
        return (0..catalog.records.len()).collect();
    }

    let by_acronym = acronym_matches(&catalog.records, q);
    if !by_acronym.is_empty() {
        tracing::debug!("'{}': {} registros por sigla", q, by_acronym.len());
        return by_acronym;
    }

    let by_index = catalog.index().search(q);
    if !by_index.is_empty() {
        tracing::debug!("'{}': {} registros por índice {}", q, by_index.len(), catalog.index().kind());
        return by_index;
    }

    let needle = fold_lower(q);
    catalog
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.search_text.contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

pub fn run_pipeline<'a>(
    catalog: &'a Catalogo,
    filters: &FilterState,
    options: &PipelineOptions,
) -> PipelineResult<'a> {
    let ids = text_query_stage(catalog, &filters.q);

    let params = FilterParams {
        blacklist: &catalog.blacklist,
        min_hours: options.min_hours,
        uf: &filters.uf,
        instituicao: &filters.instituicao,
    };
    let filtered = apply_all_filters(&catalog.records, ids, &params);

    let groups = group_by_title(filtered.iter().map(|&i| &catalog.records[i]));
    let (groups, pagination) = paginate_groups(groups, filters.page, filters.per_page, filtered.len());

    PipelineResult {
        filtered,
        groups,
        pagination,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datafiles::InstitutionLinks;
    use crate::search::exclusion::Blacklist;
    use crate::search::fuzzy::IndexOptions;
    use serde_json::json;

    fn catalog(raw: serde_json::Value) -> Catalogo {
        Catalogo::from_raw(&raw, Blacklist::default(), InstitutionLinks::new(), &IndexOptions::default())
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let c = catalog(json!([{"normalizado": "A"}, {"normalizado": "B"}]));
        assert_eq!(text_query_stage(&c, "  "), vec![0, 1]);
    }

    #[test]
    fn test_acronym_has_priority() {
        let c = catalog(json!([
            {"normalizado": "UFRJOLOGIA APLICADA", "instituicao": "Faculdade X"},
            {"normalizado": "DIREITO", "instituicao": "Univ. Federal", "sigla": "UFRJ"}
        ]));
        // el primero contiene "ufrj" en el nombre, pero la sigla manda
        assert_eq!(text_query_stage(&c, "UFRJ"), vec![1]);
    }

    #[test]
    fn test_zero_records_is_fine() {
        let c = catalog(serde_json::Value::Null);
        let res = run_pipeline(&c, &FilterState::default(), &PipelineOptions::default());
        assert!(res.filtered.is_empty());
        assert!(res.groups.is_empty());
        assert_eq!(res.pagination.total_pages, 1);
    }
}
