//! Board view model: one column per status, one card per record.

use crate::dates;
use crate::record::{Record, Status};
use std::collections::BTreeMap;

/// Due date badge shown on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueState {
    Overdue,
    DueToday,
    Upcoming,
}

impl DueState {
    /// `today` must be in sortable form.
    pub fn of(due_on: &str, today: &str) -> Self {
        if dates::is_overdue(due_on, today) {
            DueState::Overdue
        } else if dates::is_due_today(due_on, today) {
            DueState::DueToday
        } else {
            DueState::Upcoming
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub record: Record,
    pub created_display: String,
    pub due_display: String,
    pub due_state: DueState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub status: Status,
    pub cards: Vec<Card>,
}

impl Column {
    pub fn title(&self) -> &'static str {
        self.status.label()
    }

    /// Number of cases in the column.
    pub fn count(&self) -> usize {
        self.cards.len()
    }
}

/// Builds the columns in status order. `today` must be in sortable form.
pub fn columns(groups: BTreeMap<Status, Vec<Record>>, today: &str) -> Vec<Column> {
    groups
        .into_iter()
        .map(|(status, records)| Column {
            status,
            cards: records
                .into_iter()
                .map(|record| Card {
                    created_display: dates::to_display(&record.created_on),
                    due_display: dates::to_display(&record.due_on),
                    due_state: DueState::of(&record.due_on, today),
                    record,
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TODAY: &str = "2024-03-10";

    fn record(id: &str, status: Status, due_on: &str) -> Record {
        Record {
            id: id.to_string(),
            owner_id: "u1".to_string(),
            title: format!("EXP-{id}"),
            description: String::new(),
            status,
            created_on: "2024-03-01".to_string(),
            due_on: due_on.to_string(),
        }
    }

    #[test]
    fn due_state_prefers_overdue() {
        assert_eq!(DueState::of("2024-03-05", TODAY), DueState::Overdue);
        assert_eq!(DueState::of("2024-03-10", TODAY), DueState::DueToday);
        assert_eq!(DueState::of("2024-03-11", TODAY), DueState::Upcoming);
        assert_eq!(DueState::of("", TODAY), DueState::Upcoming);
    }

    #[test]
    fn columns_render_display_dates_and_counts() {
        // Arrange
        let mut groups = BTreeMap::new();
        groups.insert(Status::Pending, vec![record("1", Status::Pending, "2024-03-05")]);
        groups.insert(Status::Completed, vec![]);

        // Act
        let columns = columns(groups, TODAY);

        // Assert
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].title(), "Pendiente");
        assert_eq!(columns[0].count(), 1);
        let card = &columns[0].cards[0];
        assert_eq!(card.created_display, "01/03/2024");
        assert_eq!(card.due_display, "05/03/2024");
        assert_eq!(card.due_state, DueState::Overdue);
        assert_eq!(columns[1].count(), 0);
    }
}
