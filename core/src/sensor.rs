use crate::error::ValidationError;
use crate::input::{bounded_text, optional_date, optional_id, optional_text, present, required_text};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

pub const SENSOR_KIND_MAX: usize = 50;
pub const MAC_ADDRESS_MAX: usize = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SensorState {
    #[serde(rename = "activo")]
    Active,
    #[serde(rename = "inactivo")]
    Inactive,
    #[serde(rename = "mantenimiento")]
    Maintenance,
    #[serde(rename = "no_asignado")]
    Unassigned,
}

impl SensorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorState::Active => "activo",
            SensorState::Inactive => "inactivo",
            SensorState::Maintenance => "mantenimiento",
            SensorState::Unassigned => "no_asignado",
        }
    }

    /// Sensors start active when mounted on a hive, unassigned otherwise.
    pub fn initial(hive_id: Option<i32>) -> Self {
        if hive_id.is_some() {
            SensorState::Active
        } else {
            SensorState::Unassigned
        }
    }

    pub fn needs_attention(&self) -> bool {
        matches!(self, SensorState::Inactive | SensorState::Maintenance)
    }
}

impl fmt::Display for SensorState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "activo" => Ok(SensorState::Active),
            "inactivo" => Ok(SensorState::Inactive),
            "mantenimiento" => Ok(SensorState::Maintenance),
            "no_asignado" => Ok(SensorState::Unassigned),
            other => Err(ValidationError::Invalid(
                "estado",
                format!("'{}' no es uno de activo, inactivo, mantenimiento, no_asignado", other),
            )),
        }
    }
}

impl TryFrom<String> for SensorState {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Sensor {
    pub id: i32,
    #[serde(rename = "colmena_id")]
    pub hive_id: Option<i32>,
    #[serde(rename = "tipo_sensor")]
    pub kind: String,
    pub mac_address: Option<String>,
    #[serde(rename = "estado")]
    pub state: SensorState,
    #[serde(rename = "fecha_instalacion")]
    pub installed_on: Option<NaiveDate>,
    #[serde(rename = "ultima_lectura")]
    pub last_reading_at: Option<DateTime<Utc>>,
}

/// Body of `POST /sensores`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SensorMessage {
    pub colmena_id: Option<Value>,
    pub tipo_sensor: Option<String>,
    pub mac_address: Option<String>,
    pub estado: Option<String>,
    pub fecha_instalacion: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSensor {
    pub hive_id: Option<i32>,
    pub kind: String,
    pub mac_address: Option<String>,
    pub state: SensorState,
    pub installed_on: Option<NaiveDate>,
}

impl SensorMessage {
    pub fn validate(self) -> Result<NewSensor, ValidationError> {
        let hive_id = optional_id("colmena_id", self.colmena_id.as_ref())?;
        let state = match optional_text(self.estado) {
            Some(raw) => raw.parse::<SensorState>()?,
            None => SensorState::initial(hive_id),
        };
        Ok(NewSensor {
            hive_id,
            kind: required_text("tipo_sensor", self.tipo_sensor, SENSOR_KIND_MAX)?,
            mac_address: mac_address(self.mac_address)?,
            state,
            installed_on: optional_date("fecha_instalacion", self.fecha_instalacion)?,
        })
    }
}

/// Body of `PUT /sensores/:id`, only present fields are applied.
#[derive(Debug, Default, Deserialize)]
pub struct SensorUpdateMessage {
    #[serde(default, deserialize_with = "present")]
    pub colmena_id: Option<Option<Value>>,
    #[serde(default, deserialize_with = "present")]
    pub tipo_sensor: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub mac_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub estado: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub fecha_instalacion: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorPatch {
    pub hive_id: Option<Option<i32>>,
    pub kind: Option<String>,
    pub mac_address: Option<Option<String>>,
    pub state: Option<SensorState>,
    pub installed_on: Option<Option<NaiveDate>>,
}

impl SensorPatch {
    pub fn is_empty(&self) -> bool {
        self.hive_id.is_none()
            && self.kind.is_none()
            && self.mac_address.is_none()
            && self.state.is_none()
            && self.installed_on.is_none()
    }
}

impl SensorUpdateMessage {
    pub fn validate(self) -> Result<SensorPatch, ValidationError> {
        let hive_id = match self.colmena_id {
            None => None,
            Some(value) => Some(optional_id("colmena_id", value.as_ref())?),
        };
        let kind = match self.tipo_sensor {
            None => None,
            Some(None) => return Err(ValidationError::Missing("tipo_sensor")),
            Some(Some(kind)) => Some(bounded_text("tipo_sensor", kind, SENSOR_KIND_MAX)?),
        };
        let state = match self.estado {
            None => None,
            Some(None) => return Err(ValidationError::Missing("estado")),
            Some(Some(raw)) => Some(raw.parse::<SensorState>()?),
        };
        let mac_address = match self.mac_address {
            None => None,
            Some(raw) => Some(mac_address(raw)?),
        };
        let installed_on = match self.fecha_instalacion {
            None => None,
            Some(raw) => Some(optional_date("fecha_instalacion", raw)?),
        };
        let patch = SensorPatch {
            hive_id,
            kind,
            mac_address,
            state,
            installed_on,
        };
        if patch.is_empty() {
            return Err(ValidationError::NothingToUpdate);
        }
        Ok(patch)
    }
}

/// Query of `GET /sensores`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SensorQuery {
    pub colmena: Option<String>,
    pub mac: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorFilter {
    pub hive_id: Option<i32>,
    pub mac: Option<String>,
}

impl SensorFilter {
    pub fn hive(hive_id: i32) -> Self {
        SensorFilter {
            hive_id: Some(hive_id),
            mac: None,
        }
    }
}

impl SensorQuery {
    pub fn validate(self) -> Result<SensorFilter, ValidationError> {
        let hive = self.colmena.map(Value::String);
        Ok(SensorFilter {
            hive_id: optional_id("colmena", hive.as_ref())?,
            mac: optional_text(self.mac),
        })
    }
}

fn mac_address(raw: Option<String>) -> Result<Option<String>, ValidationError> {
    match optional_text(raw) {
        None => Ok(None),
        Some(mac) if mac.chars().count() > MAC_ADDRESS_MAX => Err(ValidationError::Text {
            field: "mac_address",
            max: MAC_ADDRESS_MAX,
        }),
        Some(mac) => Ok(Some(mac.to_uppercase())),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_round_trips_through_text() {
        for state in [
            SensorState::Active,
            SensorState::Inactive,
            SensorState::Maintenance,
            SensorState::Unassigned,
        ] {
            assert_eq!(Ok(state), state.as_str().parse::<SensorState>());
            assert_eq!(
                format!("\"{}\"", state),
                serde_json::to_string(&state).unwrap()
            );
        }
        assert!("roto".parse::<SensorState>().is_err());
    }

    #[test]
    fn test_default_state_follows_assignment() {
        let mounted = SensorMessage {
            colmena_id: Some(json!(4)),
            tipo_sensor: Some("peso".to_owned()),
            ..Default::default()
        };
        let loose = SensorMessage {
            tipo_sensor: Some("peso".to_owned()),
            ..Default::default()
        };

        assert_eq!(SensorState::Active, mounted.validate().unwrap().state);
        assert_eq!(SensorState::Unassigned, loose.validate().unwrap().state);
    }

    #[test]
    fn test_mac_address_is_normalized() {
        let msg = SensorMessage {
            tipo_sensor: Some("peso".to_owned()),
            mac_address: Some(" aa:bb:cc:dd:ee:ff ".to_owned()),
            ..Default::default()
        };
        let sensor = msg.validate().unwrap();
        assert_eq!(Some("AA:BB:CC:DD:EE:FF".to_owned()), sensor.mac_address);
    }

    #[test]
    fn test_sensor_requires_kind() {
        let msg = SensorMessage::default();
        assert_eq!(Err(ValidationError::Missing("tipo_sensor")), msg.validate());
    }

    #[test]
    fn test_update_can_unassign_hive() {
        let msg: SensorUpdateMessage =
            serde_json::from_str(r#"{"colmena_id": null, "estado": "no_asignado"}"#).unwrap();
        let patch = msg.validate().unwrap();
        assert_eq!(Some(None), patch.hive_id);
        assert_eq!(Some(SensorState::Unassigned), patch.state);
    }

    #[test]
    fn test_update_rejects_unknown_state() {
        let msg: SensorUpdateMessage = serde_json::from_str(r#"{"estado": "roto"}"#).unwrap();
        assert!(msg.validate().is_err());
    }

    #[test]
    fn test_query_ignores_blank_filters() {
        let query = SensorQuery {
            colmena: Some("".to_owned()),
            mac: Some("  ".to_owned()),
        };
        assert_eq!(SensorFilter::default(), query.validate().unwrap());
    }
}
