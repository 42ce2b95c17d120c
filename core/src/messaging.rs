use crate::error::ValidationError;
use crate::input::{flag, optional_number, required_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// One environmental measurement batch of a sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Reading {
    pub id: i32,
    pub sensor_id: i32,
    #[serde(rename = "temperatura")]
    pub temperature: f64,
    #[serde(rename = "humedad")]
    pub humidity: Option<f64>,
    #[serde(rename = "peso")]
    pub weight: Option<f64>,
    #[serde(rename = "sonido")]
    pub sound: Option<f64>,
    #[serde(rename = "lluvia")]
    pub rain: Option<bool>,
    #[serde(rename = "fecha_registro")]
    pub recorded_at: DateTime<Utc>,
}

/// Body of `POST /lecturas`, as sent by the field devices.
///
/// Devices are lenient about types: numbers may arrive as strings and the
/// rain flag as a boolean or `0`/`1`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ReadingMessage {
    pub sensor_id: Option<Value>,
    pub temperatura: Option<Value>,
    pub humedad: Option<Value>,
    pub peso: Option<Value>,
    pub sonido: Option<Value>,
    pub lluvia: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub sensor_id: i32,
    pub temperature: f64,
    pub humidity: Option<f64>,
    pub weight: Option<f64>,
    pub sound: Option<f64>,
    pub rain: Option<bool>,
}

impl ReadingMessage {
    pub fn validate(self) -> Result<NewReading, ValidationError> {
        let sensor_id = required_id("sensor_id", self.sensor_id.as_ref())?;
        let temperature = optional_number("temperatura", self.temperatura.as_ref())?
            .ok_or(ValidationError::Missing("temperatura"))?;
        Ok(NewReading {
            sensor_id,
            temperature,
            humidity: optional_number("humedad", self.humedad.as_ref())?,
            weight: optional_number("peso", self.peso.as_ref())?,
            sound: optional_number("sonido", self.sonido.as_ref())?,
            rain: flag(self.lluvia.as_ref()),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadingCreated {
    pub message: String,
    #[serde(rename = "lectura")]
    pub reading: Reading,
}
