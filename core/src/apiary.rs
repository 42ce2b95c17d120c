use crate::error::ValidationError;
use crate::input::{bounded_text, optional_text, present, required_text};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const APIARY_NAME_MAX: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Apiary {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "ubicacion")]
    pub location: Option<String>,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "fecha_creacion")]
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /apiarios`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ApiaryMessage {
    pub nombre: Option<String>,
    pub ubicacion: Option<String>,
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewApiary {
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl ApiaryMessage {
    pub fn validate(self) -> Result<NewApiary, ValidationError> {
        Ok(NewApiary {
            name: required_text("nombre", self.nombre, APIARY_NAME_MAX)?,
            location: optional_text(self.ubicacion),
            description: optional_text(self.descripcion),
        })
    }
}

/// Body of `PUT /apiarios/:id`, only present fields are applied.
#[derive(Debug, Default, Deserialize)]
pub struct ApiaryUpdateMessage {
    #[serde(default, deserialize_with = "present")]
    pub nombre: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub ubicacion: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub descripcion: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiaryPatch {
    pub name: Option<String>,
    pub location: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

impl ApiaryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.location.is_none() && self.description.is_none()
    }
}

impl ApiaryUpdateMessage {
    pub fn validate(self) -> Result<ApiaryPatch, ValidationError> {
        let name = match self.nombre {
            None => None,
            Some(None) => return Err(ValidationError::Missing("nombre")),
            Some(Some(name)) => Some(bounded_text("nombre", name, APIARY_NAME_MAX)?),
        };
        let patch = ApiaryPatch {
            name,
            location: self.ubicacion.map(optional_text),
            description: self.descripcion.map(optional_text),
        };
        if patch.is_empty() {
            return Err(ValidationError::NothingToUpdate);
        }
        Ok(patch)
    }
}
