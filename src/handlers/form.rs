//! Extrator de formulário aceitando `multipart/form-data` e urlencoded
//!
//! O frontend envia `FormData` (multipart); chamadas via curl costumam usar
//! urlencoded. Os dois viram o mesmo mapa campo -> texto.

use axum::async_trait;
use axum::extract::{Form, FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use std::collections::HashMap;

use crate::utils::logging::*;
use crate::utils::AppError;

#[derive(Debug, Default)]
pub struct FormFields(pub HashMap<String, String>);

impl FormFields {
    /// Campo obrigatório; ausente vira 400 com o nome do campo
    pub fn require(&self, name: &str) -> Result<&str, AppError> {
        self.0.get(name).map(String::as_str).ok_or_else(|| {
            log_validation_error(name, "campo ausente no formulário");
            AppError::ValidationError(format!("missing form field '{}'", name))
        })
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| AppError::ValidationError(e.body_text()))?;
            return Ok(Self(fields));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::ValidationError(e.body_text()))?;

        let mut fields = HashMap::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::ValidationError(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let value = field
                .text()
                .await
                .map_err(|e| AppError::ValidationError(e.body_text()))?;
            fields.insert(name, value);
        }

        Ok(Self(fields))
    }
}
