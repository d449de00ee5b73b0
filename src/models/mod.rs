// Estructuras de datos principales

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod fields;

pub use fields::FieldChain;

/// Un registro del catálogo (una oferta de curso) ya enriquecido.
///
/// Los campos crudos llegan como texto (faltantes => cadena vacía). Los
/// campos `*_normal` y `search_text` se calculan una sola vez al enriquecer
/// y no se modifican después.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Registro {
    pub id: String,
    pub curso: String,
    pub denominacao: String,
    /// Nombre oficial del curso; clave de agrupación.
    pub normalizado: String,
    pub normalizado_display: String,
    pub instituicao: String,
    pub sigla: String,
    pub cidade: String,
    /// Código de UF; puede traer varios separados por coma.
    pub uf: String,
    pub modalidade: String,
    pub carga_horaria: String,
    pub vagas: String,
    pub coordenador: String,

    pub instituicao_normal: String,
    pub curso_normal: String,
    pub denominacao_normal: String,
    pub normalizado_normal: String,
    pub cidade_normal: String,
    pub uf_normal: String,
    #[serde(rename = "_searchText")]
    pub search_text: String,

    /// Campos de origen sin tipo propio (sigla_instituicao, razao_social,
    /// codigo_curso, carga, ...), ya convertidos a texto.
    #[serde(flatten)]
    pub extras: BTreeMap<String, String>,
}

/// Claves derivadas que el enriquecedor calcula y nunca lee de la entrada.
pub const DERIVED_KEYS: &[&str] = &[
    "instituicao_normal",
    "curso_normal",
    "denominacao_normal",
    "normalizado_normal",
    "cidade_normal",
    "uf_normal",
    "_searchText",
];

impl Registro {
    /// Lee un campo por nombre: primero los tipados, luego `extras`.
    /// Un campo desconocido devuelve "".
    pub fn field(&self, key: &str) -> &str {
        match key {
            "id" => &self.id,
            "curso" => &self.curso,
            "denominacao" => &self.denominacao,
            "normalizado" => &self.normalizado,
            "normalizado_display" => &self.normalizado_display,
            "instituicao" => &self.instituicao,
            "sigla" => &self.sigla,
            "cidade" => &self.cidade,
            "uf" => &self.uf,
            "modalidade" => &self.modalidade,
            "carga_horaria" => &self.carga_horaria,
            "vagas" => &self.vagas,
            "coordenador" => &self.coordenador,
            "instituicao_normal" => &self.instituicao_normal,
            "curso_normal" => &self.curso_normal,
            "denominacao_normal" => &self.denominacao_normal,
            "normalizado_normal" => &self.normalizado_normal,
            "cidade_normal" => &self.cidade_normal,
            "uf_normal" => &self.uf_normal,
            "_searchText" => &self.search_text,
            other => self.extras.get(other).map(String::as_str).unwrap_or(""),
        }
    }

    /// Primer valor no vacío de la cadena de campos, o "".
    pub fn first_of(&self, chain: FieldChain) -> &str {
        chain
            .iter()
            .map(|key| self.field(key))
            .find(|v| !v.is_empty())
            .unwrap_or("")
    }
}

/// Conteo de registros por código de UF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UfCount {
    pub uf: String,
    pub count: usize,
}

/// Registros que comparten título normalizado; unidad de paginación.
/// Se construye en cada consulta y no se guarda.
#[derive(Debug, Clone, Serialize)]
pub struct TitleGroup<'a> {
    pub title: String,
    pub items: Vec<&'a Registro>,
}

/// Estado de filtros de la sesión de navegación.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub q: String,
    pub uf: String,
    pub instituicao: String,
    pub page: usize,
    pub per_page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            q: String::new(),
            uf: String::new(),
            instituicao: String::new(),
            page: 1,
            per_page: 20,
        }
    }
}

/// Metadatos de paginación por títulos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_titles: usize,
    pub total_records: usize,
    /// Posición (1-based) del primer título mostrado.
    pub start: usize,
    /// Posición del último título mostrado.
    pub end: usize,
}
