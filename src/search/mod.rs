//! Búsqueda y filtrado del catálogo.
//!
//! `pipeline::run_pipeline` encadena las etapas; cada submódulo implementa
//! una de ellas y puede usarse por separado.

pub mod acronym;
pub mod debounce;
pub mod exclusion;
pub mod filters;
pub mod fuzzy;
pub mod grouping;
pub mod pagination;
pub mod pipeline;

pub use debounce::Debouncer;
pub use exclusion::{is_excluded, Blacklist};
pub use fuzzy::{build_index, FuzzyMatcher, IndexOptions};
pub use grouping::group_by_title;
pub use pagination::{page_window, paginate_groups, per_page_for_width, PagerItem};
pub use pipeline::{run_pipeline, PipelineOptions, PipelineResult};
