use serde::{Deserialize, Serialize};

use crate::{
    catalog::Catalog,
    ids::{ConnectionId, InstanceId},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Active,
    Inactive,
    Deprecated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub units: u32,
    pub time_unit: TimeUnit,
}

/// Persisted pairing of one source and one destination plus sync settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardSync {
    pub connection_id: ConnectionId,
    pub name: String,
    pub source_id: InstanceId,
    pub destination_id: InstanceId,
    #[serde(default)]
    pub status: SyncStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
    /// Configured catalog handed to sync jobs.
    #[serde(default)]
    pub catalog: Catalog,
}
