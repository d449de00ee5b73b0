//! Paginación por títulos (no por registros) y forma del paginador.

use serde::Serialize;

use crate::models::{PageInfo, TitleGroup};
use crate::text::locale_cmp;

pub const PAGER_WINDOW: usize = 5;

/// Corta la página pedida de la lista de grupos.
///
/// `page` se ajusta a `1..=total_pages`. La ventana resultante se ordena
/// alfabéticamente por título después del corte: el orden alfabético vale
/// dentro de la página, no entre páginas.
pub fn paginate_groups<'a>(
    groups: Vec<TitleGroup<'a>>,
    page: usize,
    per_page: usize,
    total_records: usize,
) -> (Vec<TitleGroup<'a>>, PageInfo) {
    let per_page = per_page.max(1);
    let total_titles = groups.len();
    let total_pages = total_titles.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);
    let offset = (page - 1) * per_page;

    let mut window: Vec<TitleGroup<'a>> = groups.into_iter().skip(offset).take(per_page).collect();
    window.sort_by(|a, b| locale_cmp(&a.title, &b.title));

    let info = PageInfo {
        page,
        per_page,
        total_pages,
        total_titles,
        total_records,
        start: (offset + 1).min(total_titles),
        end: (offset + per_page).min(total_titles),
    };
    (window, info)
}

/// Tamaño de página según el ancho de la ventana (px).
pub fn per_page_for_width(width: u32) -> usize {
    match width {
        0..=420 => 6,
        421..=600 => 8,
        601..=900 => 12,
        901..=1100 => 16,
        _ => 20,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PagerItem {
    Prev { page: usize },
    Page { page: usize, active: bool },
    Ellipsis,
    Next { page: usize },
}

/// Botones del paginador compacto: anterior, primera página y "…",
/// una ventana de `window` páginas alrededor de la actual, "…" y última,
/// siguiente. Vacío con una sola página.
pub fn page_window(current: usize, total_pages: usize, window: usize) -> Vec<PagerItem> {
    if total_pages <= 1 {
        return Vec::new();
    }
    let window = window.max(1);
    let current = current.clamp(1, total_pages);
    let half = window / 2;

    let mut start = current.saturating_sub(half).max(1);
    let mut end = (current + half).min(total_pages);
    if end - start + 1 < window {
        if start == 1 {
            end = (start + window - 1).min(total_pages);
        } else if end == total_pages {
            start = (end + 1).saturating_sub(window).max(1);
        }
    }

    let mut items = vec![PagerItem::Prev {
        page: current.saturating_sub(1).max(1),
    }];
    if start > 1 {
        items.push(PagerItem::Page { page: 1, active: false });
        if start > 2 {
            items.push(PagerItem::Ellipsis);
        }
    }
    for p in start..=end {
        items.push(PagerItem::Page {
            page: p,
            active: p == current,
        });
    }
    if end < total_pages {
        if end < total_pages - 1 {
            items.push(PagerItem::Ellipsis);
        }
        items.push(PagerItem::Page {
            page: total_pages,
            active: false,
        });
    }
    items.push(PagerItem::Next {
        page: (current + 1).min(total_pages),
    });
    items
}
