use abejanet_core::error::ValidationError;
use serde_json::Value;
use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DBError {
    #[error(transparent)]
    SQLError(sqlx::Error),
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
}

impl From<sqlx::Error> for DBError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let constraint = db_err.constraint().unwrap_or_default().to_owned();
            match db_err.kind() {
                ErrorKind::UniqueViolation => return DBError::UniqueViolation(constraint),
                ErrorKind::ForeignKeyViolation => return DBError::ForeignKeyViolation(constraint),
                _ => {}
            }
        }
        DBError::SQLError(err)
    }
}

impl From<sqlx::migrate::MigrateError> for DBError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DBError::SQLError(sqlx::Error::Migrate(Box::new(err)))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} has an invalid value: {1}")]
    Invalid(&'static str, String),
}

/// Failure of a service operation, mapped 1:1 onto an HTTP status.
#[derive(Debug, Error)]
pub enum FarmError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    BadReference(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    Conflict {
        message: String,
        details: Option<Value>,
        hint: Option<String>,
    },
    #[error("{0}")]
    Auth(String),
    #[error(transparent)]
    Internal(#[from] DBError),
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("Token lifetime out of range")]
    TokenLifetime,
}

impl FarmError {
    pub fn conflict(message: impl Into<String>) -> Self {
        FarmError::Conflict {
            message: message.into(),
            details: None,
            hint: None,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            FarmError::Validation(_) | FarmError::BadReference(_) => 400,
            FarmError::Auth(_) => 401,
            FarmError::NotFound(_) => 404,
            FarmError::Conflict { .. } => 409,
            FarmError::Internal(_) | FarmError::Token(_) | FarmError::TokenLifetime => 500,
        }
    }
}

impl From<sqlx::Error> for FarmError {
    fn from(err: sqlx::Error) -> Self {
        FarmError::Internal(DBError::from(err))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(400, FarmError::from(ValidationError::Missing("nombre")).status());
        assert_eq!(400, FarmError::BadReference("x".to_owned()).status());
        assert_eq!(401, FarmError::Auth("x".to_owned()).status());
        assert_eq!(404, FarmError::NotFound("x".to_owned()).status());
        assert_eq!(409, FarmError::conflict("x").status());
        assert_eq!(500, FarmError::from(sqlx::Error::PoolClosed).status());
    }

    #[test]
    fn test_non_database_errors_stay_generic() {
        let err = DBError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DBError::SQLError(sqlx::Error::RowNotFound)));
    }
}
