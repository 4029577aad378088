/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login)
/// - `tasks`: Task CRUD, completion, and listing endpoints

pub mod auth;
pub mod health;
pub mod tasks;

use crate::error::{ApiError, ValidationErrorDetail};

/// Maps validator field errors into the API's validation error shape
pub(crate) fn validation_errors(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();
    ApiError::ValidationError(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct NameForm {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
    }

    #[test]
    fn test_validation_errors_carry_field_and_message() {
        let bad = NameForm {
            name: String::new(),
        };
        let err = validation_errors(bad.validate().unwrap_err());

        match err {
            ApiError::ValidationError(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "name");
                assert_eq!(details[0].message, "must not be empty");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
