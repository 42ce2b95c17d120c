use std::error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Missing(&'static str),
    Text { field: &'static str, max: usize },
    Invalid(&'static str, String),
    NothingToUpdate,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationError::Missing(field) => write!(f, "Falta el campo requerido: {}", field),
            ValidationError::Text { field, max } => {
                write!(f, "El campo {} debe ser texto (1–{} caracteres)", field, max)
            }
            ValidationError::Invalid(field, msg) => write!(f, "{} inválido: {}", field, msg),
            ValidationError::NothingToUpdate => {
                write!(f, "No se recibió ningún campo para actualizar")
            }
        }
    }
}

impl error::Error for ValidationError {}
