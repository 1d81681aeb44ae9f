//! crates/controlpet_core/src/filter.rs
//!
//! The filter/search engine shared by every roster screen: case-insensitive
//! substring search over a fixed per-entity field list, combined (AND) with
//! an optional date-range overlap test. Pure and order-preserving.

use chrono::NaiveDate;

use crate::domain::{Aluno, Relatorio, TipoEstudante};

/// An entity a roster can search over.
pub trait Searchable {
    /// The string fields the text predicate inspects.
    fn search_fields(&self) -> Vec<&str>;

    /// `[start, end]` interval for date filtering, if the entity carries one.
    /// Entities without an interval are unconstrained by date filters.
    fn period(&self) -> Option<(NaiveDate, NaiveDate)> {
        None
    }
}

/// Closed, optional-bounded user filter over report periods: both bounds
/// are inclusive, and an absent bound binds nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Boundary-inclusive interval overlap: the entity matches if it shares
    /// at least one day with the filter range. Not containment.
    pub fn overlaps(&self, interval: (NaiveDate, NaiveDate)) -> bool {
        let (entity_start, entity_end) = interval;
        let after_start = self.start.map_or(true, |s| entity_end >= s);
        let before_end = self.end.map_or(true, |e| entity_start <= e);
        after_start && before_end
    }
}

/// True if any search field contains `needle` case-insensitively.
/// An empty needle matches everything.
pub fn matches_text<T: Searchable>(item: &T, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Applies both predicates (logical AND), preserving input order.
pub fn apply<T: Searchable + Clone>(items: &[T], needle: &str, range: DateRange) -> Vec<T> {
    items
        .iter()
        .filter(|item| matches_text(*item, needle))
        .filter(|item| item.period().map_or(true, |p| range.overlaps(p)))
        .cloned()
        .collect()
}

impl Searchable for Aluno {
    fn search_fields(&self) -> Vec<&str> {
        let tipo = match self.tipo_estudante {
            TipoEstudante::Bolsista => "bolsista",
            TipoEstudante::Voluntario => "voluntario",
        };
        vec![&self.usuario.nome, &self.usuario.email, &self.curso, tipo]
    }
}

impl Searchable for Relatorio {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            &self.aluno_nome,
            &self.tipo_relatorio,
            &self.resumo_atividades,
        ]
    }

    fn period(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.data_inicial, self.data_final))
    }
}
