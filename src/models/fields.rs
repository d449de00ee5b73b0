//! Cadenas de campos alternativos.
//!
//! Los datos de origen no siempre usan la misma clave para el mismo
//! concepto; cada cadena lista las claves en el orden en que se consultan
//! y `Registro::first_of` devuelve el primer valor no vacío.

pub type FieldChain<'a> = &'a [&'a str];

/// Nombre del curso al enriquecer un registro crudo.
pub const COURSE_NAME: FieldChain<'static> = &["curso", "denominacao", "normalizado"];

/// Campos que identifican a la institución para la búsqueda por sigla.
pub const INSTITUTION_IDENTIFIERS: FieldChain<'static> = &[
    "sigla",
    "sigla_instituicao",
    "acronimo",
    "acronimo_instituicao",
    "instituicao",
    "nome_instituicao",
    "razao_social",
    "nome",
];

pub const INSTITUTION_NAME: FieldChain<'static> = &["instituicao", "nome_instituicao"];

pub const HOURS: FieldChain<'static> = &["carga_horaria", "carga"];

pub const SEATS: FieldChain<'static> = &["vagas", "vaga"];

/// Nombre "de vitrina" del curso usado por el ranking.
pub const RANKING_COURSE_NAME: FieldChain<'static> =
    &["normalizado_display", "normalizado", "denominacao", "codigo_curso"];

/// Región de un registro para el ranking.
pub const REGION: FieldChain<'static> =
    &["uf", "UF", "estado", "estado_sigla", "sigla_uf", "state"];
