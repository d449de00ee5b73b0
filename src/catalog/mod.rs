//! Catálogo en memoria: registros enriquecidos, conteo por UF, lista de
//! exclusión, links de instituciones e índice difuso.
//!
//! Un `Catalogo` se construye entero y no se modifica después. El índice
//! se arma sólo en `from_records`; recargar los datos produce un catálogo
//! nuevo que reemplaza al anterior (ver `Session::reload`).

pub mod enrich;
pub mod session;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::config::Settings;
use crate::datafiles::{self, InstitutionLinks};
use crate::models::{Registro, UfCount};
use crate::search::exclusion::Blacklist;
use crate::search::fuzzy::{build_index, FuzzyMatcher, IndexOptions};

pub use enrich::{enrich_records, region_counts};
pub use session::Session;

#[derive(Debug)]
pub struct Catalogo {
    pub records: Vec<Registro>,
    pub ufs: Vec<UfCount>,
    pub blacklist: Blacklist,
    pub links: InstitutionLinks,
    pub loaded_at: DateTime<Utc>,
    index_options: IndexOptions,
    index: Box<dyn FuzzyMatcher>,
}

impl Catalogo {
    /// Enriquece `raw` y construye conteos e índice.
    pub fn from_raw(
        raw: &Value,
        blacklist: Blacklist,
        links: InstitutionLinks,
        options: &IndexOptions,
    ) -> Self {
        Self::from_records(enrich_records(raw), blacklist, links, options)
    }

    pub fn from_records(
        records: Vec<Registro>,
        blacklist: Blacklist,
        links: InstitutionLinks,
        options: &IndexOptions,
    ) -> Self {
        let ufs = region_counts(&records);
        let index = build_index(&records, options);
        tracing::info!(
            "catálogo listo: {} registros, {} UFs, índice {}",
            records.len(),
            ufs.len(),
            index.kind()
        );
        Catalogo {
            records,
            ufs,
            blacklist,
            links,
            loaded_at: Utc::now(),
            index_options: options.clone(),
            index,
        }
    }

    pub fn empty() -> Self {
        Self::from_records(
            Vec::new(),
            Blacklist::default(),
            InstitutionLinks::new(),
            &IndexOptions::default(),
        )
    }

    /// Lee datos, lista de exclusión y links (en ese orden) desde el
    /// directorio configurado. Los archivos ausentes o inválidos se
    /// registran y se tratan como vacíos.
    pub async fn load(settings: &Settings) -> Self {
        let raw = datafiles::load_catalog(&settings.data_path()).await;
        let blacklist = datafiles::load_blacklist(&settings.blacklist_path()).await;
        let links = datafiles::load_institution_links(&settings.links_path()).await;
        Self::from_raw(
            &raw,
            blacklist,
            links,
            &IndexOptions::with_threshold(settings.fuzzy_threshold),
        )
    }

    pub fn index_options(&self) -> &IndexOptions {
        &self.index_options
    }

    pub fn index(&self) -> &dyn FuzzyMatcher {
        self.index.as_ref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_raw_builds_everything() {
        let c = Catalogo::from_raw(
            &json!([{"normalizado": "DIREITO", "uf": "SP"}, {"normalizado": "LETRAS", "uf": "SP,RJ"}]),
            Blacklist::default(),
            InstitutionLinks::new(),
            &IndexOptions::default(),
        );
        assert_eq!(c.len(), 2);
        assert_eq!(c.ufs.len(), 2);
        assert_eq!(c.index().kind(), "fuzzy");
        assert_eq!(c.index().search("letras"), vec![1]);
    }

    #[test]
    fn test_same_input_builds_same_index() {
        let raw = json!([{"normalizado": "DIREITO"}, {"normalizado": "DIREITO DIGITAL"}]);
        let options = IndexOptions::with_threshold(0.2);
        let a = Catalogo::from_raw(&raw, Blacklist::default(), InstitutionLinks::new(), &options);
        let b = Catalogo::from_raw(&raw, Blacklist::default(), InstitutionLinks::new(), a.index_options());
        assert_eq!(b.index_options(), &options);
        assert_eq!(a.index().search("direito"), b.index().search("direito"));
    }

    #[tokio::test]
    async fn test_load_from_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let c = Catalogo::load(&settings).await;
        assert!(c.is_empty());
        assert!(c.blacklist.is_empty());
        assert!(c.links.is_empty());
    }
}
