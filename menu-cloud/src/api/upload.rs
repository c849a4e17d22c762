//! Image uploads
//!
//! POST /api/uploads: multipart `file` plus `kind` and (admins) `restaurant_id`,
//! either as form fields or query parameters.
//!
//! Files land at `restaurant_<id>/<kind>/<sha256>.<ext>` below `UPLOADS_DIR`
//! and are served back under `/uploads`.

use axum::extract::{Multipart, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use super::ApiResult;
use super::extract::ApiQuery;
use crate::auth::AuthContext;
use crate::state::AppState;
use crate::storage::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Branding,
    Categories,
    Items,
}

impl UploadKind {
    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s.trim() {
            "branding" => Ok(Self::Branding),
            "categories" => Ok(Self::Categories),
            "items" => Ok(Self::Items),
            "" => Err(AppError::required("kind")),
            _ => Err(AppError::validation("Invalid upload kind").with_detail("field", "kind")),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Branding => "branding",
            Self::Categories => "categories",
            Self::Items => "items",
        }
    }

    /// Storage subdirectory for a restaurant's uploads of this kind
    pub fn subdir(&self, restaurant_id: i64) -> String {
        format!("restaurant_{restaurant_id}/{}", self.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    pub kind: Option<String>,
    pub restaurant_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Relative to the upload root; store this in `logo` / `image`
    pub path: String,
    pub url: String,
}

#[derive(Default)]
struct UploadForm {
    file: Option<(String, Vec<u8>)>,
    kind: Option<String>,
    restaurant_id: Option<String>,
}

pub async fn upload_image(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    ApiQuery(query): ApiQuery<UploadQuery>,
    multipart: Multipart,
) -> ApiResult<UploadResponse> {
    let form = read_form(multipart).await?;

    let kind = UploadKind::parse(form.kind.as_deref().or(query.kind.as_deref()).unwrap_or(""))?;
    let requested = match form.restaurant_id.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(
            raw.parse::<i64>()
                .map_err(|_| AppError::validation("Invalid restaurant_id"))?,
        ),
        _ => query.restaurant_id,
    };
    let restaurant_id = ctx.resolve_target(requested)?;

    let (filename, data) = form.file.ok_or(ErrorCode::NoFileProvided)?;

    let stored = state
        .storage
        .store(&kind.subdir(restaurant_id), &filename, &data)
        .await
        .map_err(|e| match e {
            StorageError::Rejected(code) => AppError::new(code),
            StorageError::Io(err) => {
                tracing::error!(error = %err, restaurant_id, "Failed to store upload");
                AppError::new(ErrorCode::FileStorageFailed)
            }
        })?;

    tracing::info!(
        restaurant_id,
        kind = kind.as_str(),
        path = %stored.path,
        size = data.len(),
        "Image uploaded"
    );

    Ok(Json(UploadResponse {
        url: format!("/uploads/{}", stored.path),
        path: stored.path,
    }))
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
    })? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" | "image" | "logo" if form.file.is_none() => {
                let filename = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::with_message(ErrorCode::InvalidRequest, format!("Read error: {e}"))
                })?;
                form.file = Some((filename, bytes.to_vec()));
            }
            "kind" | "restaurant_id" => {
                let text = field.text().await.map_err(|e| {
                    AppError::with_message(ErrorCode::InvalidRequest, format!("Read error: {e}"))
                })?;
                if name == "kind" {
                    form.kind = Some(text);
                } else {
                    form.restaurant_id = Some(text);
                }
            }
            _ => {}
        }
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!(UploadKind::parse("items").unwrap(), UploadKind::Items);
        assert_eq!(UploadKind::parse(" branding ").unwrap(), UploadKind::Branding);
        assert_eq!(UploadKind::parse("").unwrap_err().code, ErrorCode::RequiredField);
        assert_eq!(
            UploadKind::parse("../etc").unwrap_err().code,
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn test_subdir_layout() {
        assert_eq!(UploadKind::Categories.subdir(12), "restaurant_12/categories");
        assert_eq!(
            crate::storage::normalize_subdir(&UploadKind::Items.subdir(3)),
            "restaurant_3/items"
        );
    }
}
