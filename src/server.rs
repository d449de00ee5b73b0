use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use serde::Deserialize;
use serde_json::json;

use crate::catalog::{Catalogo, Session};
use crate::config::Settings;
use crate::datafiles;
use crate::display::{toc_regions, REFERENCE_UFS};
use crate::models::UfCount;
use crate::ranking::{compute_top, COURSES_PER_INSTITUTION, DEFAULT_TOP_COURSES, DEFAULT_TOP_INSTITUTIONS};
use crate::search::pagination::per_page_for_width;
use crate::search::{Debouncer, PipelineOptions};

/// Estado compartido por todos los handlers: una sola sesión de navegación.
pub struct AppState {
    pub session: Mutex<Session>,
    pub debouncer: Debouncer,
    pub settings: Settings,
}

impl AppState {
    pub fn new(settings: Settings, catalog: Catalogo) -> Self {
        let options = PipelineOptions {
            min_hours: settings.min_hours,
        };
        AppState {
            session: Mutex::new(Session::new(Arc::new(catalog), options)),
            debouncer: Debouncer::new(settings.debounce),
            settings,
        }
    }
}

fn session_unavailable() -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({"error": "session state unavailable"}))
}

fn lock_session(state: &AppState) -> Result<MutexGuard<'_, Session>, HttpResponse> {
    state.session.lock().map_err(|_| {
        tracing::error!("mutex de sesión envenenado");
        session_unavailable()
    })
}

/// Ejecuta `job` sobre la sesión en el pool de bloqueo de actix, fuera
/// de los workers async. Un mutex envenenado o una tarea abortada
/// responden 500.
async fn with_session<R, F>(data: &web::Data<AppState>, job: F) -> Result<R, HttpResponse>
where
    F: FnOnce(&mut Session) -> R + Send + 'static,
    R: Send + 'static,
{
    let state = data.clone();
    let outcome = web::block(move || {
        let mut session = state.session.lock().ok()?;
        Some(job(&mut *session))
    })
    .await;
    match outcome {
        Ok(Some(r)) => Ok(r),
        Ok(None) => {
            tracing::error!("mutex de sesión envenenado");
            Err(session_unavailable())
        }
        Err(e) => {
            tracing::error!("tarea de búsqueda abortada: {}", e);
            Err(HttpResponse::InternalServerError().json(json!({"error": "search task failed"})))
        }
    }
}

fn parse_usize(qm: &HashMap<String, String>, key: &str) -> Result<Option<usize>, HttpResponse> {
    match qm.get(key).map(|s| s.trim()).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(v) => v.parse::<usize>().map(Some).map_err(|_| {
            HttpResponse::BadRequest().json(json!({"error": format!("invalid value for '{}': {}", key, v)}))
        }),
    }
}

/// GET /search?q=&uf=&instituicao=&page=&per_page=&width=
/// Actualiza sólo los filtros presentes en la query y ejecuta la búsqueda.
async fn search_handler(
    data: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let qm = query.into_inner();
    let page = match parse_usize(&qm, "page") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let per_page = match parse_usize(&qm, "per_page") {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let width = match parse_usize(&qm, "width") {
        Ok(w) => w,
        Err(resp) => return resp,
    };

    let result = with_session(&data, move |session| {
        if let Some(q) = qm.get("q") {
            if *q != session.filters.q {
                session.set_query(q);
            }
        }
        if let Some(uf) = qm.get("uf") {
            if uf.trim() != session.filters.uf {
                session.set_region(uf);
            }
        }
        if let Some(inst) = qm.get("instituicao") {
            if inst.trim() != session.filters.instituicao {
                session.set_institution(inst);
            }
        }
        if let Some(pp) = per_page {
            session.set_per_page(pp);
        } else if let Some(w) = width {
            session.set_per_page(per_page_for_width(u32::try_from(w).unwrap_or(u32::MAX)));
        }
        if let Some(p) = page {
            session.set_page(p);
        }
        session.apply()
    })
    .await;

    match result {
        Ok(result) => HttpResponse::Ok().json(json!({
            "groups": result.groups,
            "pagination": result.pagination,
            "pager": result.pager,
            "filters": result.filters,
            "total_records": result.pagination.total_records,
        })),
        Err(resp) => resp,
    }
}

#[derive(Deserialize)]
struct LiveQuery {
    #[serde(default)]
    q: String,
}

/// POST /search/live {"q": "..."}
/// Sólo la última petición de una ráfaga ejecuta la búsqueda.
async fn live_search_handler(data: web::Data<AppState>, body: web::Json<LiveQuery>) -> impl Responder {
    if !data.debouncer.settle().await {
        return HttpResponse::Ok().json(json!({"status": "superseded"}));
    }
    let q = body.into_inner().q;
    match with_session(&data, move |session| {
        session.set_query(&q);
        session.apply()
    })
    .await
    {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(resp) => resp,
    }
}

/// POST /search/clear
async fn clear_handler(data: web::Data<AppState>) -> impl Responder {
    match with_session(&data, |session| {
        session.clear_filters();
        session.apply()
    })
    .await
    {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(resp) => resp,
    }
}

/// GET /search/export
/// Todos los registros filtrados en la última búsqueda (sin paginar).
async fn export_handler(data: web::Data<AppState>) -> impl Responder {
    let session = match lock_session(&data) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    HttpResponse::Ok().json(session.last_filtered_records())
}

/// GET /ufs
async fn ufs_handler(data: web::Data<AppState>) -> impl Responder {
    let session = match lock_session(&data) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    HttpResponse::Ok().json(toc_regions(&session.catalog().ufs))
}

/// GET /ufs/reference
async fn ufs_reference_handler() -> impl Responder {
    let reference: Vec<UfCount> = REFERENCE_UFS
        .iter()
        .map(|(uf, count)| UfCount {
            uf: uf.to_string(),
            count: *count,
        })
        .collect();
    HttpResponse::Ok().json(reference)
}

/// GET /top10?limit=10
async fn top10_handler(
    data: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let limit = match parse_usize(&query, "limit") {
        Ok(l) => l.unwrap_or(DEFAULT_TOP_INSTITUTIONS),
        Err(resp) => return resp,
    };
    let catalog = match lock_session(&data) {
        Ok(s) => Arc::clone(s.catalog()),
        Err(resp) => return resp,
    };
    let report = compute_top(&catalog.records, limit);
    HttpResponse::Ok().json(report.truncated(COURSES_PER_INSTITUTION, DEFAULT_TOP_COURSES))
}

/// POST /reload
/// Vuelve a leer datos, lista de exclusión y links desde el directorio de datos.
async fn reload_handler(data: web::Data<AppState>) -> impl Responder {
    let settings = &data.settings;
    let raw = datafiles::load_catalog(&settings.data_path()).await;
    let blacklist = datafiles::load_blacklist(&settings.blacklist_path()).await;
    let links = datafiles::load_institution_links(&settings.links_path()).await;

    match with_session(&data, move |session| {
        session.reload(&raw, blacklist, links);
        session.catalog().len()
    })
    .await
    {
        Ok(records) => {
            tracing::info!("catálogo recargado: {} registros", records);
            HttpResponse::Ok().json(json!({"status": "reloaded", "records": records}))
        }
        Err(resp) => resp,
    }
}

/// GET /stats
async fn stats_handler(data: web::Data<AppState>) -> impl Responder {
    let session = match lock_session(&data) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let catalog = session.catalog();
    HttpResponse::Ok().json(json!({
        "records": catalog.len(),
        "ufs": catalog.ufs.len(),
        "blacklist_terms": catalog.blacklist.len(),
        "institution_links": catalog.links.len(),
        "index": catalog.index().kind(),
        "min_hours": session.options().min_hours,
        "loaded_at": catalog.loaded_at.to_rfc3339(),
    }))
}

async fn help_handler() -> impl Responder {
    let help = json!({
        "description": "API de búsqueda del catálogo de cursos. Los resultados se agrupan por título normalizado y se paginan por título.",
        "endpoints": {
            "GET /search": "q, uf, instituicao, page, per_page, width (opcionales; sólo se cambian los filtros enviados)",
            "POST /search/live": "{\"q\": \"...\"} con antirrebote; las peticiones reemplazadas responden {\"status\": \"superseded\"}",
            "POST /search/clear": "limpia texto, UF e institución",
            "GET /search/export": "registros filtrados de la última búsqueda",
            "GET /ufs": "conteo de registros por UF",
            "GET /ufs/reference": "tabla de referencia por UF",
            "GET /top10": "limit (10 por defecto): ranking de instituciones y de cursos por cantidad de UFs",
            "POST /reload": "recarga los archivos de datos",
            "GET /stats": "tamaño del catálogo e índice en uso"
        },
        "get_example_query": "/search?q=libras&uf=SP&page=1&width=1280"
    });
    HttpResponse::Ok().json(help)
}

/// Registra todas las rutas; lo usa `run_server` y las pruebas.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/search", web::get().to(search_handler))
        .route("/search/live", web::post().to(live_search_handler))
        .route("/search/clear", web::post().to(clear_handler))
        .route("/search/export", web::get().to(export_handler))
        .route("/ufs", web::get().to(ufs_handler))
        .route("/ufs/reference", web::get().to(ufs_reference_handler))
        .route("/top10", web::get().to(top10_handler))
        .route("/reload", web::post().to(reload_handler))
        .route("/stats", web::get().to(stats_handler))
        .route("/help", web::get().to(help_handler));
}

pub async fn run_server(settings: Settings) -> std::io::Result<()> {
    let catalog = Catalogo::load(&settings).await;
    let bind_addr = settings.bind.clone();
    let data = web::Data::new(AppState::new(settings, catalog));

    tracing::info!("servidor escuchando en http://{}", bind_addr);
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(Cors::permissive())
            .configure(configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
