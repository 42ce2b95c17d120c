use crate::error::ValidationError;
use crate::input::{bounded_text, optional_id, optional_text, present, required_text};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

pub const PERSON_NAME_MAX: usize = 100;
pub const EMAIL_MAX: usize = 150;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub id: i32,
    pub nombre: String,
}

/// A user as exposed by the API. The password never leaves the store
/// through this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub nombre: Option<String>,
    pub apellido_paterno: Option<String>,
    pub apellido_materno: Option<String>,
    pub correo_electronico: String,
    pub push_token: Option<String>,
    pub rol_id: Option<i32>,
    pub nombre_rol: Option<String>,
    pub esta_activo: bool,
    pub fecha_creacion: DateTime<Utc>,
}

/// Body of `POST /usuarios`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserMessage {
    pub nombre: Option<String>,
    pub apellido_paterno: Option<String>,
    pub apellido_materno: Option<String>,
    pub correo_electronico: Option<String>,
    pub contrasena: Option<String>,
    pub push_token: Option<String>,
    pub rol_id: Option<Value>,
    pub esta_activo: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub second_last_name: Option<String>,
    pub email: String,
    pub password: Option<String>,
    pub push_token: Option<String>,
    pub role_id: Option<i32>,
    pub active: bool,
}

impl UserMessage {
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        Ok(NewUser {
            first_name: person_name("nombre", self.nombre)?,
            last_name: person_name("apellido_paterno", self.apellido_paterno)?,
            second_last_name: person_name("apellido_materno", self.apellido_materno)?,
            email: email(self.correo_electronico)?,
            password: self.contrasena.filter(|p| !p.is_empty()),
            push_token: optional_text(self.push_token),
            role_id: optional_id("rol_id", self.rol_id.as_ref())?,
            active: self.esta_activo.unwrap_or(true),
        })
    }
}

/// Body of `PUT /usuarios/:id`, only present fields are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdateMessage {
    #[serde(default, deserialize_with = "present")]
    pub nombre: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub apellido_paterno: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub apellido_materno: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub correo_electronico: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub contrasena: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub push_token: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub rol_id: Option<Option<Value>>,
    #[serde(default, deserialize_with = "present")]
    pub esta_activo: Option<Option<bool>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub second_last_name: Option<Option<String>>,
    pub email: Option<String>,
    pub password: Option<Option<String>>,
    pub push_token: Option<Option<String>>,
    pub role_id: Option<Option<i32>>,
    pub active: Option<bool>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.second_last_name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.push_token.is_none()
            && self.role_id.is_none()
            && self.active.is_none()
    }
}

impl UserUpdateMessage {
    pub fn validate(self) -> Result<UserPatch, ValidationError> {
        let patch = UserPatch {
            first_name: self
                .nombre
                .map(|v| person_name("nombre", v))
                .transpose()?,
            last_name: self
                .apellido_paterno
                .map(|v| person_name("apellido_paterno", v))
                .transpose()?,
            second_last_name: self
                .apellido_materno
                .map(|v| person_name("apellido_materno", v))
                .transpose()?,
            email: self.correo_electronico.map(email).transpose()?,
            password: self.contrasena.map(|p| p.filter(|p| !p.is_empty())),
            push_token: self.push_token.map(optional_text),
            role_id: self
                .rol_id
                .map(|v| optional_id("rol_id", v.as_ref()))
                .transpose()?,
            active: match self.esta_activo {
                None => None,
                Some(None) => return Err(ValidationError::Missing("esta_activo")),
                Some(active) => active,
            },
        };
        if patch.is_empty() {
            return Err(ValidationError::NothingToUpdate);
        }
        Ok(patch)
    }
}

/// Body of `POST /login`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoginMessage {
    pub correo_electronico: Option<String>,
    pub contrasena: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "usuario")]
    pub user: User,
}

fn person_name(field: &'static str, value: Option<String>) -> Result<Option<String>, ValidationError> {
    match optional_text(value) {
        None => Ok(None),
        Some(name) => bounded_text(field, name, PERSON_NAME_MAX).map(Some),
    }
}

fn email(value: Option<String>) -> Result<String, ValidationError> {
    let email = required_text("correo_electronico", value, EMAIL_MAX)?;
    if !email.contains('@') {
        return Err(ValidationError::Invalid(
            "correo_electronico",
            "debe contener '@'".to_owned(),
        ));
    }
    Ok(email)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_user_defaults_to_active() {
        let msg = UserMessage {
            correo_electronico: Some(" ana@abejanet.mx ".to_owned()),
            contrasena: Some("secreta".to_owned()),
            rol_id: Some(json!(2)),
            ..Default::default()
        };

        let user = msg.validate().unwrap();

        assert!(user.active);
        assert_eq!("ana@abejanet.mx", user.email);
        assert_eq!(Some(2), user.role_id);
    }

    #[test]
    fn test_new_user_requires_email() {
        assert_eq!(
            Err(ValidationError::Missing("correo_electronico")),
            UserMessage::default().validate()
        );
        let msg = UserMessage {
            correo_electronico: Some("sin-arroba".to_owned()),
            ..Default::default()
        };
        assert!(msg.validate().is_err());
    }

    #[test]
    fn test_update_rejects_null_email() {
        let msg: UserUpdateMessage =
            serde_json::from_str(r#"{"correo_electronico": null}"#).unwrap();
        assert!(msg.validate().is_err());
    }

    #[test]
    fn test_update_can_deactivate() {
        let msg: UserUpdateMessage = serde_json::from_str(r#"{"esta_activo": false}"#).unwrap();
        let patch = msg.validate().unwrap();
        assert_eq!(Some(false), patch.active);
        assert!(patch.email.is_none());
    }

    #[test]
    fn test_user_serializes_without_password() {
        let user = User {
            id: 1,
            nombre: Some("Ana".to_owned()),
            apellido_paterno: None,
            apellido_materno: None,
            correo_electronico: "ana@abejanet.mx".to_owned(),
            push_token: None,
            rol_id: Some(1),
            nombre_rol: Some("administrador".to_owned()),
            esta_activo: true,
            fecha_creacion: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("contrasena").is_none());
        assert_eq!("administrador", json["nombre_rol"]);
    }
}
