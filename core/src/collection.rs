//! Row bookkeeping for a dynamic collection of sub-forms.
//!
//! The field-name conventions follow the management-form protocol the server
//! expects: each row's fields are named `{prefix}-{index}-{field}`, the total
//! slot count lives in `{prefix}-TOTAL_FORMS`, and per-row delete/identifier
//! fields carry the `-DELETE` / `-id` suffixes.

pub const TOTAL_SUFFIX: &str = "-TOTAL_FORMS";
pub const DELETE_SUFFIX: &str = "-DELETE";
pub const ID_SUFFIX: &str = "-id";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowRecord {
    pub index: usize,
    pub persisted: bool,
    pub deleted: bool,
}

/// What the DOM layer should do with the row that was asked to go away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveAction {
    /// Persisted row: flag its delete field, hide it, keep it in the DOM so
    /// the server still receives its slot.
    SoftDelete,
    /// Transient row: take it out of the DOM entirely.
    Detach,
    /// Unknown or already-removed reference.
    Ignore,
}

/// Source of truth for one collection. The DOM renders this state; it never
/// drives it.
pub struct CollectionState {
    next_index: usize,
    rows: Vec<RowRecord>,
}

impl CollectionState {
    pub fn new(next_index: usize) -> Self {
        Self {
            next_index,
            rows: Vec::new(),
        }
    }

    /// Registers a row that already existed in the page at startup.
    pub fn bind_existing(&mut self, index: usize, persisted: bool) {
        self.rows.push(RowRecord {
            index,
            persisted,
            deleted: false,
        });
        if index >= self.next_index {
            self.next_index = index + 1;
        }
    }

    /// Value the total-count field should carry.
    pub fn counter(&self) -> usize {
        self.next_index
    }

    /// Claims the next index for a freshly materialized transient row and
    /// advances the counter by exactly one.
    pub fn add_row(&mut self) -> usize {
        let index = self.next_index;
        self.rows.push(RowRecord {
            index,
            persisted: false,
            deleted: false,
        });
        self.next_index = index + 1;
        index
    }

    /// Decides the removal policy for `index`. Persisted rows are
    /// soft-deleted exactly once; transient rows are dropped from the record
    /// list. The counter is never decremented, so an index can never be
    /// reissued while the collection lives.
    pub fn remove_row(&mut self, index: usize) -> RemoveAction {
        let Some(position) = self.rows.iter().position(|row| row.index == index) else {
            return RemoveAction::Ignore;
        };
        let row = &mut self.rows[position];
        if row.persisted {
            if row.deleted {
                return RemoveAction::Ignore;
            }
            row.deleted = true;
            RemoveAction::SoftDelete
        } else {
            self.rows.remove(position);
            RemoveAction::Detach
        }
    }

    pub fn row(&self, index: usize) -> Option<&RowRecord> {
        self.rows.iter().find(|row| row.index == index)
    }

    /// Rows that still take part in visual interaction.
    pub fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows
            .iter()
            .filter(|row| !row.deleted)
            .map(|row| row.index)
    }
}

pub fn field_name(prefix: &str, index: usize, field: &str) -> String {
    format!("{prefix}-{index}-{field}")
}

pub fn counter_name(prefix: &str) -> String {
    format!("{prefix}{TOTAL_SUFFIX}")
}

/// Extracts the row index from a full field name like `equipment-4-serial`.
pub fn index_from_field_name(prefix: &str, name: &str) -> Option<usize> {
    let rest = name.strip_prefix(prefix)?.strip_prefix('-')?;
    let (index, _) = rest.split_once('-')?;
    index.parse().ok()
}
