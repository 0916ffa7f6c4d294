use chrono::NaiveDateTime;
use serde::Serialize;

use crate::model::repository::{ItemStatus, Rgb};

/// the derived year → month → day → item browsing tree, newest-first at every
/// level. A pure projection of live records; never persisted
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct ProjectTree {
    pub years: Vec<YearNode>,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct YearNode {
    pub year: String,
    pub color: Rgb,
    pub months: Vec<MonthNode>,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct MonthNode {
    /// full month name, e.g. "March"
    pub name: String,
    pub color: Rgb,
    pub days: Vec<DayNode>,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct DayNode {
    pub day: String,
    pub color: Rgb,
    pub items: Vec<DayItem>,
}

/// one logical project item (batch) inside a day bucket
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct DayItem {
    /// the underlying record id, used for stable descending ordering
    pub record_id: u32,
    pub item_id: String,
    pub status: ItemStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
