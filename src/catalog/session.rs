//! Controlador de la sesión de navegación.
//!
//! Es dueño del estado de filtros y de la referencia al catálogo vigente.
//! Cada acción del usuario es un método; `apply` ejecuta el flujo completo
//! y deja guardada la lista filtrada para exportar.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::catalog::Catalogo;
use crate::datafiles::InstitutionLinks;
use crate::display::{group_view, GroupView};
use crate::models::{FilterState, PageInfo, Registro};
use crate::search::exclusion::Blacklist;
use crate::search::pagination::{page_window, PagerItem, PAGER_WINDOW};
use crate::search::pipeline::{run_pipeline, PipelineOptions};

/// Resultado de `Session::apply`, listo para serializar.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub groups: Vec<GroupView>,
    pub pagination: PageInfo,
    pub pager: Vec<PagerItem>,
    pub filters: FilterState,
}

#[derive(Debug)]
pub struct Session {
    catalog: Arc<Catalogo>,
    pub filters: FilterState,
    options: PipelineOptions,
    last_filtered: Vec<usize>,
}

impl Session {
    pub fn new(catalog: Arc<Catalogo>, options: PipelineOptions) -> Self {
        Session {
            catalog,
            filters: FilterState::default(),
            options,
            last_filtered: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalogo> {
        &self.catalog
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn set_query(&mut self, q: &str) {
        self.filters.q = q.to_string();
        self.filters.page = 1;
    }

    pub fn set_region(&mut self, uf: &str) {
        self.filters.uf = uf.trim().to_string();
        self.filters.page = 1;
    }

    pub fn set_institution(&mut self, instituicao: &str) {
        self.filters.instituicao = instituicao.trim().to_string();
        self.filters.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.filters.page = page.max(1);
    }

    pub fn set_per_page(&mut self, per_page: usize) {
        self.filters.per_page = per_page.max(1);
    }

    /// Búsqueda lanzada desde otra vista (p. ej. un curso del ranking):
    /// limpia el filtro de institución y vuelve a la página 1.
    pub fn trigger_search(&mut self, query: &str) {
        self.filters.instituicao.clear();
        self.set_query(query);
    }

    /// Limpia texto, UF e institución y vuelve a la página 1. El tamaño de
    /// página no se toca.
    pub fn clear_filters(&mut self) {
        self.filters.q.clear();
        self.filters.uf.clear();
        self.filters.instituicao.clear();
        self.filters.page = 1;
    }

    /// Ejecuta el flujo con los filtros actuales.
    pub fn apply(&mut self) -> SearchPage {
        let catalog = Arc::clone(&self.catalog);
        let result = run_pipeline(&catalog, &self.filters, &self.options);

        self.filters.page = result.pagination.page;
        self.last_filtered = result.filtered;

        SearchPage {
            groups: result
                .groups
                .iter()
                .map(|g| group_view(g, &catalog.links))
                .collect(),
            pager: page_window(result.pagination.page, result.pagination.total_pages, PAGER_WINDOW),
            pagination: result.pagination,
            filters: self.filters.clone(),
        }
    }

    /// Registros que pasaron los filtros en el último `apply`.
    pub fn last_filtered_records(&self) -> Vec<&Registro> {
        self.last_filtered
            .iter()
            .filter_map(|&i| self.catalog.records.get(i))
            .collect()
    }

    /// Reconstruye registros, conteos e índice desde datos crudos en un solo
    /// paso, con las mismas opciones de índice del catálogo anterior. Los
    /// filtros se conservan, la página vuelve a 1 y se descarta la última
    /// lista filtrada.
    pub fn reload(&mut self, raw: &Value, blacklist: Blacklist, links: InstitutionLinks) {
        let catalog = Catalogo::from_raw(raw, blacklist, links, self.catalog.index_options());
        self.catalog = Arc::new(catalog);
        self.last_filtered.clear();
        self.filters.page = 1;
    }
}
