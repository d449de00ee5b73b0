//! Modelos de vista para la superficie de render (la API JSON).
//!
//! Nada aquí filtra ni ordena resultados de búsqueda; sólo da forma a lo
//! que produce `search::pipeline`.

pub mod regions;

use std::collections::HashMap;

use serde::Serialize;
use url::Url;

use crate::catalog::enrich::split_ufs;
use crate::datafiles::InstitutionLinks;
use crate::models::fields::{HOURS, SEATS};
use crate::models::{Registro, TitleGroup};
use crate::text::{locale_cmp, to_title_case};

pub use regions::{toc_regions, REFERENCE_UFS};

/// Instituciones visibles por grupo antes de "mostrar más".
pub const PREVIEW_BUCKETS: usize = 2;

const SEARCH_ENGINE: &str = "https://www.google.com/search";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstitutionLabel {
    pub label: String,
    pub url: String,
}

/// Etiqueta "SIGLA - Institución" con su link. `None` si el registro no
/// tiene institución. Sin link en la tabla se usa una búsqueda web.
pub fn institution_display(record: &Registro, links: &InstitutionLinks) -> Option<InstitutionLabel> {
    let inst = record.instituicao.trim();
    if inst.is_empty() {
        return None;
    }
    let url = match links.get(inst) {
        Some(u) => u.to_string(),
        None => search_url(inst),
    };
    let sigla = record.sigla.trim();
    let label = if sigla.chars().any(char::is_alphanumeric) {
        format!("{} - {}", sigla, inst)
    } else {
        inst.to_string()
    };
    Some(InstitutionLabel { label, url })
}

fn search_url(inst: &str) -> String {
    let query = format!("{} site:br", inst);
    match Url::parse_with_params(SEARCH_ENGINE, &[("q", query.as_str())]) {
        Ok(u) => u.into(),
        Err(e) => {
            tracing::warn!("no se pudo armar la URL de búsqueda para '{}': {}", inst, e);
            String::new()
        }
    }
}

/// Una institución dentro de un grupo de títulos, con los datos de su
/// primer registro.
#[derive(Debug, Clone, Serialize)]
pub struct InstitutionBucket {
    pub label: String,
    pub url: Option<String>,
    pub ufs: Vec<String>,
    pub representative_id: String,
    pub carga_horaria: String,
    pub vagas: String,
    pub coordenador: String,
    pub records: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    pub title: String,
    pub display_title: String,
    pub variants: usize,
    pub modalities: Vec<String>,
    pub ufs: Vec<String>,
    pub preview: Vec<InstitutionBucket>,
    pub overflow: Vec<InstitutionBucket>,
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

pub fn group_view(group: &TitleGroup, links: &InstitutionLinks) -> GroupView {
    let mut modalities = Vec::new();
    let mut ufs = Vec::new();
    for r in &group.items {
        push_unique(&mut modalities, r.modalidade.trim());
        for uf in split_ufs(&r.uf) {
            push_unique(&mut ufs, uf);
        }
    }

    // registros sin institución forman cada uno su propio bucket
    let mut buckets: Vec<(Option<InstitutionLabel>, Vec<&Registro>)> = Vec::new();
    let mut by_label: HashMap<String, usize> = HashMap::new();
    for &r in &group.items {
        match institution_display(r, links) {
            Some(label) => match by_label.get(&label.label) {
                Some(&i) => buckets[i].1.push(r),
                None => {
                    by_label.insert(label.label.clone(), buckets.len());
                    buckets.push((Some(label), vec![r]));
                }
            },
            None => buckets.push((None, vec![r])),
        }
    }

    let mut views: Vec<InstitutionBucket> = buckets
        .into_iter()
        .map(|(label, items)| bucket_view(label, &items))
        .collect();
    views.sort_by(|a, b| locale_cmp(&a.label, &b.label));
    let overflow = views.split_off(PREVIEW_BUCKETS.min(views.len()));

    GroupView {
        title: group.title.clone(),
        display_title: to_title_case(&group.title),
        variants: group.items.len(),
        modalities,
        ufs,
        preview: views,
        overflow,
    }
}

fn bucket_view(label: Option<InstitutionLabel>, items: &[&Registro]) -> InstitutionBucket {
    let rep = items[0];
    let mut ufs = Vec::new();
    for r in items {
        push_unique(&mut ufs, r.uf.trim());
    }
    let (label, url) = match label {
        Some(l) => (l.label, Some(l.url)),
        None => (String::new(), None),
    };
    InstitutionBucket {
        label,
        url,
        ufs,
        representative_id: rep.id.clone(),
        carga_horaria: rep.first_of(HOURS).to_string(),
        vagas: rep.first_of(SEATS).to_string(),
        coordenador: rep.coordenador.clone(),
        records: items.len(),
    }
}
