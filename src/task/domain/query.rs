//! Filtering, sorting and counting of task lists.

use super::Task;
use crate::entity::{Entity, PriorityId, StatusId, TagId};
use crate::taxonomy::domain::Status;
use chrono::{DateTime, Datelike, Days, NaiveTime, Utc};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Deadline window a task must fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DueWindow {
    /// Deadline strictly before now.
    Overdue,
    /// Deadline on the current UTC day.
    DueToday,
    /// Deadline in the current Sunday-to-Saturday UTC week.
    DueThisWeek,
}

impl DueWindow {
    fn contains(self, deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let today = now.date_naive();
        match self {
            Self::Overdue => deadline < now,
            Self::DueToday => deadline.date_naive() == today,
            Self::DueThisWeek => {
                let since_sunday = u64::from(today.weekday().num_days_from_sunday());
                let Some(start) = today.checked_sub_days(Days::new(since_sunday)) else {
                    return false;
                };
                let Some(next_start) = start.checked_add_days(Days::new(7)) else {
                    return false;
                };
                let start_at = start.and_time(NaiveTime::MIN).and_utc();
                let next_at = next_start.and_time(NaiveTime::MIN).and_utc();
                deadline >= start_at && deadline < next_at
            }
        }
    }
}

/// Criteria a task must meet to be listed. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    status: Option<StatusId>,
    search: Option<String>,
    priority: Option<PriorityId>,
    tags: Vec<TagId>,
    due: Vec<DueWindow>,
}

impl TaskFilter {
    /// Creates a filter that matches every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps tasks in one status.
    #[must_use]
    pub fn with_status(mut self, status_id: impl Into<StatusId>) -> Self {
        self.status = Some(status_id.into());
        self
    }

    /// Keeps tasks whose title contains `query`, ignoring case.
    #[must_use]
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        let text = query.into();
        self.search = (!text.is_empty()).then(|| text.to_lowercase());
        self
    }

    /// Keeps tasks with one priority.
    #[must_use]
    pub fn with_priority(mut self, priority_id: impl Into<PriorityId>) -> Self {
        self.priority = Some(priority_id.into());
        self
    }

    /// Keeps tasks carrying at least one of `tags`.
    #[must_use]
    pub fn with_any_tag(mut self, tags: impl IntoIterator<Item = TagId>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Keeps tasks whose deadline falls in `window`.
    ///
    /// Windows accumulate: a task must fall in every window given.
    #[must_use]
    pub fn with_due(mut self, window: DueWindow) -> Self {
        if !self.due.contains(&window) {
            self.due.push(window);
        }
        self
    }

    /// Returns `true` when `task` meets every criterion at time `now`.
    #[must_use]
    pub fn matches(&self, task: &Task, now: DateTime<Utc>) -> bool {
        if self.status.as_ref().is_some_and(|status| task.status_id() != status) {
            return false;
        }
        if let Some(query) = &self.search {
            if !task.title().to_lowercase().contains(query.as_str()) {
                return false;
            }
        }
        if !self.due.is_empty() {
            let within = task.deadline_at().is_some_and(|deadline| {
                self.due
                    .iter()
                    .all(|window| window.contains(deadline, now))
            });
            if !within {
                return false;
            }
        }
        if self
            .priority
            .as_ref()
            .is_some_and(|priority| task.priority_id() != Some(priority))
        {
            return false;
        }
        self.tags.is_empty() || self.tags.iter().any(|tag| task.has_tag(tag))
    }

    /// Returns the tasks that match, keeping their order.
    #[must_use]
    pub fn apply(&self, tasks: Vec<Task>, now: DateTime<Utc>) -> Vec<Task> {
        tasks
            .into_iter()
            .filter(|task| self.matches(task, now))
            .collect()
    }
}

/// Attribute tasks are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Title, case-insensitively.
    Title,
    /// Deadline; tasks without one come after those with one.
    Deadline,
    /// Creation time.
    TimeAdded,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

/// Ordering of a task list, written as `"<field>-<direction>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskSort {
    field: SortField,
    direction: SortDirection,
}

/// Error returned for an unknown sort expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task sort '{0}': expected title|deadline|timeAdded-asc|desc")]
pub struct ParseTaskSortError(pub String);

impl Default for TaskSort {
    fn default() -> Self {
        Self::new(SortField::TimeAdded, SortDirection::Desc)
    }
}

impl TaskSort {
    /// Creates a sort order.
    #[must_use]
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Returns the sorted field.
    #[must_use]
    pub const fn field(self) -> SortField {
        self.field
    }

    /// Returns the direction.
    #[must_use]
    pub const fn direction(self) -> SortDirection {
        self.direction
    }

    fn compare(self, left: &Task, right: &Task) -> Ordering {
        let ascending = match self.field {
            SortField::Title => left
                .title()
                .to_lowercase()
                .cmp(&right.title().to_lowercase())
                .then_with(|| left.title().cmp(right.title())),
            SortField::Deadline => match (left.deadline_at(), right.deadline_at()) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortField::TimeAdded => left.created_at().cmp(&right.created_at()),
        };
        match self.direction {
            SortDirection::Asc => ascending,
            SortDirection::Desc => ascending.reverse(),
        }
    }

    /// Sorts tasks in place. The sort is stable.
    pub fn sort(self, tasks: &mut [Task]) {
        tasks.sort_by(|left, right| self.compare(left, right));
    }
}

impl FromStr for TaskSort {
    type Err = ParseTaskSortError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (field, direction) = raw
            .split_once('-')
            .ok_or_else(|| ParseTaskSortError(raw.to_owned()))?;
        let parsed_field = match field {
            "title" => SortField::Title,
            "deadline" => SortField::Deadline,
            "timeAdded" => SortField::TimeAdded,
            _ => return Err(ParseTaskSortError(raw.to_owned())),
        };
        let parsed_direction = match direction {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return Err(ParseTaskSortError(raw.to_owned())),
        };
        Ok(Self::new(parsed_field, parsed_direction))
    }
}

impl fmt::Display for TaskSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = match self.field {
            SortField::Title => "title",
            SortField::Deadline => "deadline",
            SortField::TimeAdded => "timeAdded",
        };
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{field}-{direction}")
    }
}

/// Number of tasks in one status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCount {
    /// The counted status.
    pub status: Status,
    /// Tasks currently in it.
    pub count: usize,
}

/// Counts tasks per status, in the order `statuses` are given.
///
/// Tasks whose status no longer exists are not counted anywhere.
#[must_use]
pub fn count_by_status(tasks: &[Task], statuses: &[Status]) -> Vec<StatusCount> {
    statuses
        .iter()
        .map(|status| StatusCount {
            status: status.clone(),
            count: tasks
                .iter()
                .filter(|task| task.status_id() == status.id())
                .count(),
        })
        .collect()
}
