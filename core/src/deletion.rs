use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Only `1` and `true` (any case) request a forced delete.
pub fn force_requested(raw: Option<&str>) -> bool {
    match raw {
        Some(value) => {
            let value = value.to_lowercase();
            value == "1" || value == "true"
        }
        None => false,
    }
}

/// Query of the `DELETE` endpoints
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct DeleteQuery {
    pub force: Option<String>,
}

impl DeleteQuery {
    pub fn forced(&self) -> bool {
        force_requested(self.force.as_deref())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HiveDependencies {
    pub sensores: i64,
    pub lecturas: i64,
}

impl HiveDependencies {
    pub fn is_empty(&self) -> bool {
        self.sensores == 0 && self.lecturas == 0
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiaryDependencies {
    pub colmenas: i64,
}

impl ApiaryDependencies {
    pub fn is_empty(&self) -> bool {
        self.colmenas == 0
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SensorDependencies {
    pub lecturas: i64,
}

impl SensorDependencies {
    pub fn is_empty(&self) -> bool {
        self.lecturas == 0
    }
}

/// Rows removed by a forced cascade, in deletion order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CascadeReport {
    pub readings: u64,
    pub sensors: u64,
    pub hives: u64,
}

/// Success body of every `DELETE` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Deletion {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub forced: bool,
    pub deleted: u64,
    pub id: i32,
}

impl Deletion {
    pub fn plain(id: i32, deleted: u64) -> Self {
        Deletion {
            ok: true,
            forced: false,
            deleted,
            id,
        }
    }

    pub fn forced(id: i32, deleted: u64) -> Self {
        Deletion {
            ok: true,
            forced: true,
            deleted,
            id,
        }
    }
}
