use crate::error::ValidationError;
use crate::input::{bounded_text, optional_text, present, required_id, required_text};
use crate::messaging::Reading;
use crate::sensor::Sensor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

pub const HIVE_NAME_MAX: usize = 100;
/// Readings shown on the hive dashboard
pub const HIVE_DETAIL_READINGS: i64 = 20;

/// A hive joined with the name of its apiary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Hive {
    pub id: i32,
    #[serde(rename = "apiario_id")]
    pub apiary_id: i32,
    #[serde(rename = "apiario")]
    pub apiary_name: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion_especifica")]
    pub description: Option<String>,
    #[serde(rename = "fecha_creacion")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HiveDetail {
    #[serde(rename = "colmena")]
    pub hive: Hive,
    #[serde(rename = "sensores")]
    pub sensors: Vec<Sensor>,
    #[serde(rename = "lecturas")]
    pub readings: Vec<Reading>,
}

/// Body of `POST /colmenas`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct HiveMessage {
    pub apiario_id: Option<Value>,
    pub nombre: Option<String>,
    pub descripcion_especifica: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewHive {
    pub apiary_id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl HiveMessage {
    pub fn validate(self) -> Result<NewHive, ValidationError> {
        Ok(NewHive {
            apiary_id: required_id("apiario_id", self.apiario_id.as_ref())?,
            name: required_text("nombre", self.nombre, HIVE_NAME_MAX)?,
            description: optional_text(self.descripcion_especifica),
        })
    }
}

/// Body of `PUT /colmenas/:id`, only present fields are applied.
#[derive(Debug, Default, Deserialize)]
pub struct HiveUpdateMessage {
    #[serde(default, deserialize_with = "present")]
    pub apiario_id: Option<Option<Value>>,
    #[serde(default, deserialize_with = "present")]
    pub nombre: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub descripcion_especifica: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HivePatch {
    pub apiary_id: Option<i32>,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

impl HivePatch {
    pub fn is_empty(&self) -> bool {
        self.apiary_id.is_none() && self.name.is_none() && self.description.is_none()
    }
}

impl HiveUpdateMessage {
    pub fn validate(self) -> Result<HivePatch, ValidationError> {
        let apiary_id = match self.apiario_id {
            None => None,
            Some(value) => Some(required_id("apiario_id", value.as_ref())?),
        };
        let name = match self.nombre {
            None => None,
            Some(None) => return Err(ValidationError::Missing("nombre")),
            Some(Some(name)) => Some(bounded_text("nombre", name, HIVE_NAME_MAX)?),
        };
        let patch = HivePatch {
            apiary_id,
            name,
            description: self.descripcion_especifica.map(optional_text),
        };
        if patch.is_empty() {
            return Err(ValidationError::NothingToUpdate);
        }
        Ok(patch)
    }
}
