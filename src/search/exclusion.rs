use std::collections::BTreeSet;

use crate::models::Registro;

/// Conjunto de términos de exclusión, en MAYÚSCULAS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist(BTreeSet<String>);

impl Blacklist {
    pub fn insert(&mut self, term: &str) {
        let term = term.trim().to_uppercase();
        if !term.is_empty() {
            self.0.insert(term);
        }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.0.contains(&term.trim().to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for Blacklist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut bl = Blacklist::default();
        for term in iter {
            bl.insert(term.as_ref());
        }
        bl
    }
}

/// Un registro queda excluido si su `normalizado` contiene algún término.
/// Conjunto vacío o `normalizado` vacío: nunca se excluye.
pub fn is_excluded(record: &Registro, blacklist: &Blacklist) -> bool {
    if blacklist.is_empty() || record.normalizado.is_empty() {
        return false;
    }
    let name = record.normalizado.to_uppercase();
    blacklist.iter().any(|term| name.contains(term))
}
