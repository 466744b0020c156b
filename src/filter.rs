// View derivation: filter, search and sort over a collection snapshot

use crate::todo::{Todo, TodoFilter, TodoSort};
use feruca::Collator;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Ephemeral view settings applied on top of the collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub filter: TodoFilter,
    pub search: String,
    pub sort: TodoSort,
}

impl ViewState {
    pub fn new(filter: TodoFilter, search: impl Into<String>, sort: TodoSort) -> Self {
        Self {
            filter,
            search: search.into(),
            sort,
        }
    }
}

/// Derive the ordered view of `todos`
///
/// Stages run in a fixed order: filter, then search, then a stable sort.
pub fn derive_view(todos: &[Todo], view: &ViewState) -> Vec<Todo> {
    let needle = view.search.trim().to_lowercase();

    let mut visible: Vec<Todo> = todos
        .iter()
        .filter(|t| matches_filter(t, view.filter))
        .filter(|t| needle.is_empty() || matches_search(t, &needle))
        .cloned()
        .collect();

    // Stable sorts: equal keys keep collection order
    match view.sort {
        TodoSort::CreatedDescending => visible.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        TodoSort::TitleAscending => {
            let mut collator = Collator::default();
            visible.sort_by(|a, b| compare_titles(&mut collator, a, b));
        }
        TodoSort::StatusGrouped => visible.sort_by(|a, b| a.completed.cmp(&b.completed)),
    }
    visible
}

fn matches_filter(todo: &Todo, filter: TodoFilter) -> bool {
    match filter {
        TodoFilter::All => true,
        TodoFilter::Active => !todo.completed,
        TodoFilter::Completed => todo.completed,
    }
}

// `needle` is already lowercased
fn matches_search(todo: &Todo, needle: &str) -> bool {
    todo.title.to_lowercase().contains(needle)
        || todo
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

// Unicode Collation Algorithm with the CLDR root order: accents and case
// are secondary/tertiary differences, lowercase before uppercase
fn compare_titles(collator: &mut Collator, a: &Todo, b: &Todo) -> Ordering {
    collator.collate(a.title.as_str(), b.title.as_str())
}
