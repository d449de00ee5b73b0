//! Rankings sobre el catálogo completo (sin filtros de la sesión):
//! instituciones por cantidad de registros y cursos por cantidad de UFs
//! distintas en que se ofrecen.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::catalog::enrich::split_ufs;
use crate::models::fields::{RANKING_COURSE_NAME, REGION};
use crate::models::Registro;
use crate::text::{locale_cmp, normalize_course_title};

pub const DEFAULT_TOP_INSTITUTIONS: usize = 10;
pub const COURSES_PER_INSTITUTION: usize = 8;
pub const DEFAULT_TOP_COURSES: usize = 10;

/// UF usada cuando el registro no tiene ninguna; no cuenta como región.
pub const UNKNOWN_REGION: &str = "UNKN";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseSummary {
    pub key: String,
    /// Nombre del curso tal como llegó en el primer registro del grupo.
    pub canonical: String,
    pub variants: usize,
    /// UFs conocidas. El orden dentro de la institución cuenta además
    /// `UNKN`, así que un curso sin UF puede quedar antes que otro con la
    /// misma cantidad de UFs conocidas.
    pub region_count: usize,
    pub regions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstitutionRank {
    pub name: String,
    pub total_records: usize,
    pub courses: Vec<CourseSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseBreadth {
    pub key: String,
    pub region_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopReport {
    pub top: Vec<InstitutionRank>,
    pub global_course_ranking: Vec<CourseBreadth>,
}

impl TopReport {
    /// Copia recortada para mostrar: `per_institution` cursos por
    /// institución y `top_courses` cursos en el ranking global.
    pub fn truncated(&self, per_institution: usize, top_courses: usize) -> TopReport {
        TopReport {
            top: self
                .top
                .iter()
                .map(|inst| InstitutionRank {
                    courses: inst.courses.iter().take(per_institution).cloned().collect(),
                    ..inst.clone()
                })
                .collect(),
            global_course_ranking: self.global_course_ranking.iter().take(top_courses).cloned().collect(),
        }
    }
}

struct CourseAcc {
    canonical: String,
    variants: usize,
    regions: BTreeSet<String>,
}

struct InstitutionAcc {
    name: String,
    total: usize,
    order: Vec<String>,
    courses: HashMap<String, CourseAcc>,
}

/// UFs de un registro, en MAYÚSCULAS. `UNKN` si no hay ninguna.
fn regions_of(record: &Registro) -> Vec<String> {
    let raw = record.first_of(REGION).trim().to_uppercase();
    let parts: Vec<String> = split_ufs(&raw).map(str::to_string).collect();
    if parts.is_empty() {
        vec![UNKNOWN_REGION.to_string()]
    } else {
        parts
    }
}

fn known_regions(set: &BTreeSet<String>) -> Vec<String> {
    set.iter().filter(|r| *r != UNKNOWN_REGION).cloned().collect()
}

pub fn compute_top(records: &[Registro], limit: usize) -> TopReport {
    let mut order: Vec<String> = Vec::new();
    let mut institutions: HashMap<String, InstitutionAcc> = HashMap::new();
    let mut course_regions: HashMap<String, BTreeSet<String>> = HashMap::new();

    for r in records {
        let name = r.instituicao.trim();
        if name.is_empty() {
            continue;
        }
        let inst_key = name.to_uppercase();
        let inst = institutions.entry(inst_key.clone()).or_insert_with(|| {
            order.push(inst_key.clone());
            InstitutionAcc {
                name: name.to_string(),
                total: 0,
                order: Vec::new(),
                courses: HashMap::new(),
            }
        });
        inst.total += 1;

        let raw_course = r.first_of(RANKING_COURSE_NAME);
        let key = normalize_course_title(raw_course);
        if key.is_empty() {
            continue;
        }
        let regions = regions_of(r);

        let course = inst.courses.entry(key.clone()).or_insert_with(|| {
            inst.order.push(key.clone());
            CourseAcc {
                canonical: raw_course.trim().to_string(),
                variants: 0,
                regions: BTreeSet::new(),
            }
        });
        course.variants += 1;
        course.regions.extend(regions.iter().cloned());
        course_regions.entry(key).or_default().extend(regions);
    }

    let mut top: Vec<InstitutionRank> = order
        .iter()
        .filter_map(|k| institutions.remove(k))
        .map(|mut inst| {
            // el orden usa todas las UFs vistas, `UNKN` incluida; la vista
            // muestra sólo las conocidas
            let mut courses: Vec<(usize, CourseSummary)> = inst
                .order
                .iter()
                .filter_map(|k| inst.courses.remove(k).map(|c| (k, c)))
                .map(|(k, c)| {
                    let regions = known_regions(&c.regions);
                    let summary = CourseSummary {
                        key: k.clone(),
                        canonical: c.canonical,
                        variants: c.variants,
                        region_count: regions.len(),
                        regions,
                    };
                    (c.regions.len(), summary)
                })
                .collect();
            courses.sort_by(|(a_seen, a), (b_seen, b)| {
                b_seen
                    .cmp(a_seen)
                    .then(b.variants.cmp(&a.variants))
                    .then_with(|| locale_cmp(&a.canonical, &b.canonical))
            });
            let courses = courses.into_iter().map(|(_, c)| c).collect();
            InstitutionRank {
                name: inst.name,
                total_records: inst.total,
                courses,
            }
        })
        .collect();
    top.sort_by(|a, b| {
        b.total_records
            .cmp(&a.total_records)
            .then_with(|| locale_cmp(&a.name, &b.name))
    });
    top.truncate(limit);

    let mut global_course_ranking: Vec<CourseBreadth> = course_regions
        .into_iter()
        .map(|(key, set)| CourseBreadth {
            region_count: known_regions(&set).len(),
            key,
        })
        .collect();
    global_course_ranking.sort_by(|a, b| {
        b.region_count
            .cmp(&a.region_count)
            .then_with(|| locale_cmp(&a.key, &b.key))
            .then_with(|| a.key.cmp(&b.key))
    });

    TopReport {
        top,
        global_course_ranking,
    }
}
