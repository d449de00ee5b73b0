use std::collections::HashMap;

use crate::models::{Registro, TitleGroup};
use crate::text::normalize_course_title;

/// Agrupa registros por `normalize_course_title(normalizado)`.
///
/// Los grupos salen en el orden en que aparece cada título por primera vez
/// y los registros de cada grupo conservan el orden de entrada. Registros
/// con título normalizado vacío no entran en ningún grupo.
pub fn group_by_title<'a, I>(records: I) -> Vec<TitleGroup<'a>>
where
    I: IntoIterator<Item = &'a Registro>,
{
    let mut groups: Vec<TitleGroup<'a>> = Vec::new();
    let mut position: HashMap<String, usize> = HashMap::new();

    for r in records {
        let key = normalize_course_title(&r.normalizado);
        if key.is_empty() {
            continue;
        }
        match position.get(&key) {
            Some(&i) => groups[i].items.push(r),
            None => {
                position.insert(key.clone(), groups.len());
                groups.push(TitleGroup {
                    title: key,
                    items: vec![r],
                });
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registro(normalizado: &str) -> Registro {
        Registro {
            normalizado: normalizado.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_groups_variants_in_first_seen_order() {
        let records = vec![
            registro("PSICOPEDAGOGIA"),
            registro("CURSO DE LIBRAS - MODULO I"),
            registro(""),
            registro("Psicopedagogia II"),
            registro("CURSO DE LIBRAS - MODULO II"),
            registro("   "),
        ];
        let groups = group_by_title(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].title, "PSICOPEDAGOGIA");
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[1].title, "CURSO DE LIBRAS");
        assert_eq!(groups[1].items[0].normalizado, "CURSO DE LIBRAS - MODULO I");

        let non_empty = records
            .iter()
            .filter(|r| !normalize_course_title(&r.normalizado).is_empty())
            .count();
        let grouped: usize = groups.iter().map(|g| g.items.len()).sum();
        assert!(groups.len() <= non_empty);
        assert_eq!(grouped, non_empty);
    }
}
