use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::task::{Prioridade, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Pending,
    Completed,
}

impl Filter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Pending => !task.concluida,
            Filter::Completed => task.concluida,
        }
    }

    pub fn next(self) -> Filter {
        match self {
            Filter::All => Filter::Pending,
            Filter::Pending => Filter::Completed,
            Filter::Completed => Filter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "todas",
            Filter::Pending => "pendentes",
            Filter::Completed => "concluídas",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sort {
    #[default]
    Priority,
    DueDate,
}

impl Sort {
    pub fn next(self) -> Sort {
        match self {
            Sort::Priority => Sort::DueDate,
            Sort::DueDate => Sort::Priority,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sort::Priority => "prioridade",
            Sort::DueDate => "vencimento",
        }
    }
}

/// Derives the on-screen list from the snapshot. Pure: the snapshot is never
/// touched, and the same inputs always give the same order.
pub fn project(snapshot: &[Task], filter: Filter, sort: Sort) -> Vec<&Task> {
    let mut view: Vec<&Task> = snapshot.iter().filter(|t| filter.matches(t)).collect();
    match sort {
        // sort_by is stable, so snapshot order survives full ties.
        Sort::Priority => view.sort_by(|a, b| by_priority(a, b)),
        Sort::DueDate => view.sort_by(|a, b| by_due_date(a.data_vencimento, b.data_vencimento)),
    }
    view
}

/// Rank ascending, then due date; a dated task beats an undated one among
/// equal-priority ties.
fn by_priority(a: &Task, b: &Task) -> Ordering {
    Prioridade::rank(a.prioridade)
        .cmp(&Prioridade::rank(b.prioridade))
        .then_with(|| by_due_date(a.data_vencimento, b.data_vencimento))
}

fn by_due_date(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
