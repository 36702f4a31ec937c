//! Snapshot persistence
//!
//! The whole editor state is written as one JSON document under a fixed key
//! in a [`KeyValueStore`]. Loading applies each top-level field only when it
//! is present, so older or partial snapshots fill in what they have and leave
//! the rest of the in-memory state as it was.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::group::CurveGroup;
use crate::helper::DrawingHelper;
use crate::session::Session;
use crate::settings::SettingUpdate;
use crate::types::{ControlHandle, Point, Tool};

/// Key the editor state is stored under.
pub const STORAGE_KEY: &str = "curve-tracer-state";

/// Persistent string store with browser-local-storage semantics.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Write `value`. On error the previous value for `key` is untouched.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store, optionally capped at a total number of bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(quota),
        }
    }

    fn used_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let available = quota.saturating_sub(self.used_excluding(key));
            let needed = key.len() + value.len();
            if needed > available {
                return Err(StoreError::QuotaExceeded { needed, available });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.entry_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        // write aside and rename so a failed write never truncates the entry
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        let result = fs::write(&tmp, value).and_then(|()| fs::rename(&tmp, self.entry_path(key)));
        if let Err(e) = result {
            if let Err(cleanup) = fs::remove_file(&tmp)
                && cleanup.kind() != io::ErrorKind::NotFound
            {
                tracing::warn!("Could not remove {}: {}", tmp.display(), cleanup);
            }
            return Err(e.into());
        }
        Ok(())
    }
}

/// Control handle as stored: `{x1, y1, x2, y2}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlRecord {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl From<&ControlHandle> for ControlRecord {
    fn from(c: &ControlHandle) -> Self {
        Self {
            x1: c.first.x,
            y1: c.first.y,
            x2: c.second.x,
            y2: c.second.y,
        }
    }
}

impl From<ControlRecord> for ControlHandle {
    fn from(r: ControlRecord) -> Self {
        ControlHandle::new(Point::new(r.x1, r.y1), Point::new(r.x2, r.y2))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: String,
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default)]
    pub controls: Vec<ControlRecord>,
}

impl From<&CurveGroup> for GroupRecord {
    fn from(group: &CurveGroup) -> Self {
        Self {
            id: group.id().to_string(),
            points: group.points().to_vec(),
            controls: group.controls().iter().map(ControlRecord::from).collect(),
        }
    }
}

impl From<GroupRecord> for CurveGroup {
    fn from(record: GroupRecord) -> Self {
        CurveGroup::from_parts(
            record.id,
            record.points,
            record.controls.into_iter().map(ControlHandle::from).collect(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Complete editor state as stored. Every field is optional on the way in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_pos: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve_groups: Option<Vec<GroupRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_tool: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_range: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_precision: Option<usize>,
}

impl Snapshot {
    /// Capture committed state. In-progress drags are not included.
    pub fn capture(helper: &DrawingHelper, session: &Session) -> Self {
        let settings = &helper.settings;
        let reference = &helper.reference;
        Self {
            timestamp: Some(chrono::Utc::now().timestamp_millis()),
            origin_pos: Some(helper.origin()),
            curve_groups: Some(helper.groups().iter().map(GroupRecord::from).collect()),
            active_group_id: helper.active_group_id().map(str::to_string),
            reference: Some(ReferenceRecord {
                scale: Some(reference.scale()),
                offset: Some(reference.offset()),
                opacity: Some(reference.opacity()),
                color: Some(reference.color().to_string()),
                data: Some(reference.persistable_data().to_string()),
            }),
            active_tool: Some(session.tool.index()),
            line_width: Some(settings.line_width),
            point_range: Some(settings.point_range()),
            point_size: Some(settings.point_size()),
            active_opacity: Some(settings.active_opacity),
            inactive_opacity: Some(settings.inactive_opacity),
            main_color: Some(settings.main_color.clone()),
            control_color: Some(settings.control_color.clone()),
            origin_color: Some(settings.origin_color.clone()),
            output_precision: Some(settings.output_precision),
        }
    }

    /// Apply every present field to the editor, leaving absent ones alone.
    pub fn apply(self, helper: &mut DrawingHelper, session: &mut Session) {
        if let Some(origin) = self.origin_pos {
            helper.set_origin(origin);
        }
        if let Some(groups) = self.curve_groups {
            helper.replace_groups(groups.into_iter().map(CurveGroup::from).collect());
        }
        if let Some(id) = self.active_group_id {
            // unknown ids are logged and keep the current selection
            helper.set_active_group(&id);
        }
        if let Some(reference) = self.reference {
            let image = &mut helper.reference;
            if let Some(scale) = reference.scale {
                image.set_scale(scale);
            }
            if let Some(offset) = reference.offset {
                image.set_offset(offset);
            }
            if let Some(opacity) = reference.opacity {
                image.set_opacity(opacity);
            }
            if let Some(color) = reference.color {
                image.set_color(color);
            }
            if let Some(data) = reference.data {
                image.set_data(data);
            }
        }
        if let Some(index) = self.active_tool {
            match Tool::from_index(index) {
                Some(tool) => session.set_tool(tool),
                None => tracing::warn!("Snapshot has unknown tool index {}", index),
            }
        }

        let updates = [
            self.line_width.map(SettingUpdate::LineWidth),
            self.point_range.map(SettingUpdate::PointRange),
            self.point_size.map(SettingUpdate::PointSize),
            self.active_opacity.map(SettingUpdate::ActiveOpacity),
            self.inactive_opacity.map(SettingUpdate::InactiveOpacity),
            self.main_color.map(SettingUpdate::MainColor),
            self.control_color.map(SettingUpdate::ControlColor),
            self.origin_color.map(SettingUpdate::OriginColor),
            self.output_precision.map(SettingUpdate::OutputPrecision),
        ];
        for update in updates.into_iter().flatten() {
            helper.settings.apply(update);
        }
    }
}

/// Write a snapshot of the editor under [`STORAGE_KEY`].
pub fn save(
    store: &mut dyn KeyValueStore,
    helper: &DrawingHelper,
    session: &Session,
) -> Result<(), StoreError> {
    let snapshot = Snapshot::capture(helper, session);
    let result = serde_json::to_string(&snapshot)
        .map_err(StoreError::from)
        .and_then(|json| store.set(STORAGE_KEY, &json));
    match &result {
        Ok(()) => tracing::info!("Saved {} groups", helper.groups().len()),
        Err(e) => tracing::error!("Saving editor state failed: {}", e),
    }
    result
}

/// Restore the editor from the stored snapshot. Returns false when nothing
/// has been saved yet.
pub fn load(
    store: &dyn KeyValueStore,
    helper: &mut DrawingHelper,
    session: &mut Session,
) -> Result<bool, StoreError> {
    let Some(json) = store.get(STORAGE_KEY)? else {
        tracing::info!("No saved editor state");
        return Ok(false);
    };
    load_str(&json, helper, session)?;
    Ok(true)
}

/// Apply a snapshot given as a JSON string, e.g. a user-supplied file.
pub fn load_str(
    json: &str,
    helper: &mut DrawingHelper,
    session: &mut Session,
) -> Result<(), StoreError> {
    let snapshot: Snapshot = serde_json::from_str(json)?;
    if let Some(ts) = snapshot.timestamp {
        tracing::info!("Loading editor state saved at {}", ts);
    }
    snapshot.apply(helper, session);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_counts_existing_entries_except_the_replaced_one() {
        let mut store = MemoryStore::with_quota(20);
        store.set("a", "123456789").unwrap();
        assert!(store.set("a", "1234567890123456789").is_ok());
        assert!(matches!(
            store.set("b", "12345"),
            Err(StoreError::QuotaExceeded { .. })
        ));
    }

    #[test]
    fn absent_active_group_is_not_serialized() {
        let helper = DrawingHelper::new();
        let json = serde_json::to_string(&Snapshot::capture(&helper, &Session::default())).unwrap();
        assert!(!json.contains("activeGroupId"));
        assert!(json.contains("\"originPos\""));
        assert!(json.contains("\"outputPrecision\":2"));
    }
}
