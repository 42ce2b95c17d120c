use super::{write_error, FarmService};
use crate::auth::Claims;
use crate::error::FarmError;
use abejanet_core::error::ValidationError;
use abejanet_core::{
    Deletion, LoginMessage, LoginResponse, Role, User, UserMessage, UserUpdateMessage,
};
use tracing::{info, warn};

pub const USER_NOT_FOUND: &str = "Usuario no encontrado";
pub const EMAIL_TAKEN: &str = "El correo electrónico ya está registrado.";
pub const EMAIL_TAKEN_BY_OTHER: &str = "El correo electrónico ya está en uso por otro usuario.";
pub const UNKNOWN_ROLE: &str = "rol_id inválido (no existe)";
pub const INACTIVE_OR_UNKNOWN: &str = "Usuario no encontrado o inactivo";
pub const WRONG_PASSWORD: &str = "Contraseña incorrecta";

fn user_not_found() -> FarmError {
    FarmError::NotFound(USER_NOT_FOUND.to_owned())
}

impl FarmService {
    /// Checks the credentials of an active user and issues a session token.
    #[tracing::instrument(skip(self, msg))]
    pub async fn login(&self, msg: LoginMessage) -> Result<LoginResponse, FarmError> {
        let email = msg
            .correo_electronico
            .map(|e| e.trim().to_owned())
            .filter(|e| !e.is_empty())
            .ok_or(ValidationError::Missing("correo_electronico"))?;
        let password = msg
            .contrasena
            .filter(|p| !p.is_empty())
            .ok_or(ValidationError::Missing("contrasena"))?;

        let Some((user, stored)) = self.repo.active_credentials(&email).await? else {
            warn!("Login for unknown or inactive user");
            return Err(FarmError::Auth(INACTIVE_OR_UNKNOWN.to_owned()));
        };
        if stored.as_deref() != Some(password.as_str()) {
            warn!(user_id = user.id, "Login with wrong password");
            return Err(FarmError::Auth(WRONG_PASSWORD.to_owned()));
        }

        let token = self.tokens.issue(&user)?;
        info!(user_id = user.id, "User logged in");
        Ok(LoginResponse { token, user })
    }

    /// Decodes the bearer token of the `Authorization` header.
    pub fn session(&self, authorization: Option<&str>) -> Result<Claims, FarmError> {
        self.tokens.verify_header(authorization)
    }

    pub async fn list_users(&self, email: Option<String>) -> Result<Vec<User>, FarmError> {
        let email = email
            .map(|e| e.trim().to_owned())
            .filter(|e| !e.is_empty());
        Ok(self.repo.list_users(email.as_deref()).await?)
    }

    pub async fn get_user(&self, email: &str) -> Result<User, FarmError> {
        self.repo
            .get_user_by_email(email.trim())
            .await?
            .ok_or_else(user_not_found)
    }

    async fn check_role_reference(&self, role_id: Option<i32>) -> Result<(), FarmError> {
        match role_id {
            Some(role_id) if !self.repo.role_exists(role_id).await? => {
                Err(FarmError::BadReference(UNKNOWN_ROLE.to_owned()))
            }
            _ => Ok(()),
        }
    }

    pub async fn create_user(&self, msg: UserMessage) -> Result<User, FarmError> {
        let user = msg.validate()?;
        self.check_role_reference(user.role_id).await?;
        let created = self
            .repo
            .insert_user(&user)
            .await
            .map_err(|err| write_error(err, EMAIL_TAKEN, UNKNOWN_ROLE))?;
        info!(user_id = created.id, "Created user");
        Ok(created)
    }

    pub async fn update_user(&self, user_id: i32, msg: UserUpdateMessage) -> Result<User, FarmError> {
        let patch = msg.validate()?;
        self.check_role_reference(patch.role_id.flatten()).await?;
        self.repo
            .update_user(user_id, &patch)
            .await
            .map_err(|err| write_error(err, EMAIL_TAKEN_BY_OTHER, UNKNOWN_ROLE))?
            .ok_or_else(user_not_found)
    }

    pub async fn delete_user(&self, user_id: i32) -> Result<Deletion, FarmError> {
        match self.repo.delete_user(user_id).await? {
            0 => Err(user_not_found()),
            deleted => {
                info!(user_id, "Deleted user");
                Ok(Deletion::plain(user_id, deleted))
            }
        }
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, FarmError> {
        Ok(self.repo.list_roles().await?)
    }
}
