//! Validaciones comunes del motor
//!
//! Chequeos de frontera que se repiten en varios controllers/servicios.

use crate::utils::errors::{AppError, AppResult};

/// Una cantidad solicitada o recibida debe ser estrictamente positiva
pub fn require_positive_quantity(quantity: i32, field: &str) -> AppResult<()> {
    if quantity <= 0 {
        return Err(AppError::InvariantViolation(format!(
            "{} must be greater than zero (got {})",
            field, quantity
        )));
    }
    Ok(())
}

/// Una cantidad objetivo de ajuste no puede ser negativa
pub fn require_non_negative_quantity(quantity: i32, field: &str) -> AppResult<()> {
    if quantity < 0 {
        return Err(AppError::InvariantViolation(format!(
            "{} cannot be negative (got {})",
            field, quantity
        )));
    }
    Ok(())
}

/// Un texto de razón no puede venir vacío
pub fn require_reason(reason: &str) -> AppResult<()> {
    if reason.trim().is_empty() {
        return Err(AppError::BadRequest("A reason is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_quantity() {
        assert!(require_positive_quantity(1, "quantity").is_ok());
        assert!(require_positive_quantity(0, "quantity").is_err());
        assert!(require_positive_quantity(-3, "quantity").is_err());
    }

    #[test]
    fn test_non_negative_quantity() {
        assert!(require_non_negative_quantity(0, "new_quantity").is_ok());
        assert!(require_non_negative_quantity(-1, "new_quantity").is_err());
    }

    #[test]
    fn test_reason() {
        assert!(require_reason("inventario anual").is_ok());
        assert!(require_reason("   ").is_err());
    }
}
