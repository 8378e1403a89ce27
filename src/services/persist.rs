//! Saving records that carry a worksheet

use chrono::Utc;

use crate::audit::Audited;
use crate::error::ApuResult;
use crate::models::{Analysis, Budget};
use crate::pricing::Worksheet;
use crate::storage::{JsonRepository, Record, Storage};

/// A stored record whose lines live in a [`Worksheet`]
pub trait Priced: Record + Audited {
    fn worksheet_mut(&mut self) -> &mut Worksheet;

    /// Stamp the modification time
    fn touch(&mut self);
}

impl Priced for Analysis {
    fn worksheet_mut(&mut self) -> &mut Worksheet {
        &mut self.worksheet
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Priced for Budget {
    fn worksheet_mut(&mut self) -> &mut Worksheet {
        &mut self.worksheet
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Write a priced record and audit the change
///
/// On success the worksheet is `Saved`. On failure it keeps its pending
/// changes and the repository still holds the previously stored copy.
pub fn save_priced<T: Priced>(
    storage: &Storage,
    repository: &JsonRepository<T>,
    record: &mut T,
) -> ApuResult<()> {
    record.touch();

    let previous = match repository.commit(record.clone()) {
        Ok(previous) => previous,
        Err(e) => {
            record.worksheet_mut().mark_save_failed();
            return Err(e);
        }
    };

    record.worksheet_mut().mark_saved();
    repository.upsert(record.clone())?;

    match previous {
        Some(before) => storage.log_update(&before, &*record),
        None => storage.log_create(&*record),
    }
}
