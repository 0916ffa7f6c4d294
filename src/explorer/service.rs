use std::backtrace::Backtrace;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::explorer::models::{DayItem, DayNode, MonthNode, ProjectTree, YearNode};
use crate::model::error::explorer_errors::{GetTreeError, RecolorError};
use crate::model::repository::{FileRecord, Rgb};
use crate::repository::{file_record_repository, metadata_repository, open_connection};
use crate::util::lock_or_recover;
use crate::CatalogContext;

/// how long a cached tree stays fresh for callers that don't explicitly
/// invalidate after writing
const CACHE_TTL: Duration = Duration::from_secs(30);

struct CacheEntry {
    tree: Option<ProjectTree>,
    built_at: Instant,
}

/// Read-optimized, cached view over the live records. Every mutating path must
/// call [`ProjectIndex::invalidate`]; the TTL only covers writers that can't.
pub struct ProjectIndex {
    cache: Mutex<Option<CacheEntry>>,
}

impl ProjectIndex {
    pub fn new() -> Self {
        ProjectIndex {
            cache: Mutex::new(None),
        }
    }

    /// Returns the browsing tree, reusing the cache when it's fresh enough.
    /// `None` means there are no live records at all.
    pub fn get(&self, force_refresh: bool) -> Result<Option<ProjectTree>, GetTreeError> {
        if !force_refresh {
            let cache = lock_or_recover(&self.cache);
            if let Some(entry) = cache.as_ref() {
                if entry.built_at.elapsed() < CACHE_TTL {
                    log::debug!("Using cached project structure");
                    return Ok(entry.tree.clone());
                }
            }
        }
        let con = open_connection();
        let records = match file_record_repository::get_all_records(None, &con) {
            Ok(records) => records,
            Err(e) => {
                log::error!(
                    "Failed to load records for the project tree! Error is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                con.close().unwrap();
                return Err(GetTreeError::DbError);
            }
        };
        con.close().unwrap();
        let tree = build_tree(records);
        let mut cache = lock_or_recover(&self.cache);
        *cache = Some(CacheEntry {
            tree: tree.clone(),
            built_at: Instant::now(),
        });
        Ok(tree)
    }

    /// drops the cached tree so the next [`ProjectIndex::get`] rebuilds
    pub fn invalidate(&self) {
        *lock_or_recover(&self.cache) = None;
    }
}

impl Default for ProjectIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Repaints records from previous calendar years with a muted gray so the
/// current year's colors stand out. Guarded by a per-year marker, so the
/// repaint runs at most once per year per install.
pub fn recolor_stale_years(context: &CatalogContext) -> Result<(), RecolorError> {
    let current_year = chrono::offset::Local::now().format("%Y").to_string();
    let marker = format!("stale_recolor_{current_year}");
    let con = open_connection();
    if metadata_repository::get_value(&marker, &con).is_ok() {
        con.close().unwrap();
        return Ok(());
    }
    let now = chrono::offset::Local::now().naive_local();
    let changed =
        match file_record_repository::recolor_stale_years(&current_year, &Rgb::STALE_YEAR, now, &con)
        {
            Ok(changed) => changed,
            Err(e) => {
                log::error!(
                    "Failed to recolor records from previous years! Error is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                con.close().unwrap();
                return Err(RecolorError::DbError);
            }
        };
    if let Err(e) = metadata_repository::set_value(&marker, "done", &con) {
        log::error!(
            "Failed to store the recolor marker for {current_year}! Error is {e:?}\n{}",
            Backtrace::force_capture()
        );
        con.close().unwrap();
        return Err(RecolorError::DbError);
    }
    con.close().unwrap();
    if changed > 0 {
        log::info!("Repainted {changed} records from previous years");
        context.index.invalidate();
        context.bus.publish(crate::events::PROJECT_DATA_CHANGED);
    }
    Ok(())
}

struct DayBucket {
    color: Rgb,
    items: Vec<DayItem>,
}

/// Groups live records into the year/month/day hierarchy. Batches are
/// deduplicated by item_id, first stored occurrence winning; every level is
/// sorted newest-first, and items within a day by descending record id so the
/// order stays stable even with identical timestamps.
fn build_tree(records: Vec<FileRecord>) -> Option<ProjectTree> {
    if records.is_empty() {
        return None;
    }
    let mut seen_items: HashSet<String> = HashSet::new();
    type MonthMap = HashMap<String, (Rgb, HashMap<String, DayBucket>)>;
    let mut years: HashMap<String, (Rgb, MonthMap)> = HashMap::new();
    for record in records {
        if !seen_items.insert(record.item_id.clone()) {
            continue;
        }
        let (_, months) = years
            .entry(record.year.clone())
            .or_insert_with(|| (record.year_color, HashMap::new()));
        let (_, days) = months
            .entry(record.month.clone())
            .or_insert_with(|| (record.month_color, HashMap::new()));
        let bucket = days.entry(record.day.clone()).or_insert_with(|| DayBucket {
            color: record.day_color,
            items: Vec::new(),
        });
        bucket.items.push(DayItem {
            record_id: record.id.unwrap_or(0),
            item_id: record.item_id,
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        });
    }

    let mut year_nodes: Vec<YearNode> = Vec::new();
    let mut year_keys: Vec<String> = years.keys().cloned().collect();
    year_keys.sort_by(|a, b| b.cmp(a));
    for year_key in year_keys {
        let (year_color, months) = years.remove(&year_key).unwrap_or((Rgb(0, 0, 0), HashMap::new()));
        let mut month_nodes: Vec<MonthNode> = Vec::new();
        let mut month_keys: Vec<String> = months.keys().cloned().collect();
        // calendar order, not lexical
        month_keys.sort_by_key(|name| std::cmp::Reverse(month_number(name)));
        let mut months = months;
        for month_key in month_keys {
            let (month_color, days) = match months.remove(&month_key) {
                Some(entry) => entry,
                None => continue,
            };
            let mut day_nodes: Vec<DayNode> = Vec::new();
            let mut day_keys: Vec<String> = days.keys().cloned().collect();
            day_keys.sort_by_key(|day| std::cmp::Reverse(day.parse::<u32>().unwrap_or(0)));
            let mut days = days;
            for day_key in day_keys {
                let mut bucket = match days.remove(&day_key) {
                    Some(bucket) => bucket,
                    None => continue,
                };
                bucket.items.sort_by_key(|item| std::cmp::Reverse(item.record_id));
                day_nodes.push(DayNode {
                    day: day_key,
                    color: bucket.color,
                    items: bucket.items,
                });
            }
            month_nodes.push(MonthNode {
                name: month_key,
                color: month_color,
                days: day_nodes,
            });
        }
        year_nodes.push(YearNode {
            year: year_key,
            color: year_color,
            months: month_nodes,
        });
    }
    Some(ProjectTree { years: year_nodes })
}

fn month_number(name: &str) -> u32 {
    match name {
        "January" => 1,
        "February" => 2,
        "March" => 3,
        "April" => 4,
        "May" => 5,
        "June" => 6,
        "July" => 7,
        "August" => 8,
        "September" => 9,
        "October" => 10,
        "November" => 11,
        "December" => 12,
        _ => 0,
    }
}
