#![forbid(unsafe_code)]

use serde::Serialize;
use std::fmt;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeAction {
    Created,
    Updated,
    Deleted,
}

impl NoticeAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

/// User-facing confirmation of a successful mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub action: NoticeAction,
    pub entity: &'static str,
    pub record: String,
}

impl Notice {
    pub(crate) fn emit(action: NoticeAction, entity: &'static str, record: String) -> Self {
        let notice = Self {
            action,
            entity,
            record,
        };
        info!(
            action = notice.action.as_str(),
            entity = notice.entity,
            record = %notice.record,
            "{notice}"
        );
        notice
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.record.is_empty() {
            write!(f, "{} {}.", self.entity, self.action.as_str())
        } else {
            write!(
                f,
                "{} \"{}\" {}.",
                self.entity,
                self.record,
                self.action.as_str()
            )
        }
    }
}
