//! Multipart form walking and upload validation.
//!
//! Both the create and update endpoints accept `multipart/form-data`; the
//! walker below collects their fields into a [`VideoForm`] and the validators
//! enforce the content-type and size rules before any bytes hit storage.

use axum::extract::multipart::{Field, Multipart};
use std::str::FromStr;

use clipstream_core::constants::{MAX_DESCRIPTION_LEN, MAX_TAG_LEN, MAX_TITLE_LEN};
use clipstream_core::models::Visibility;
use clipstream_core::AppError;

/// One uploaded file part, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

impl UploadedFile {
    /// Lowercased, sanitized extension of the original filename; `default`
    /// when there is none. Only alphanumeric characters survive, so the
    /// result is always safe to embed in a blob key.
    pub fn extension_or(&self, default: &str) -> String {
        let ext = self
            .filename
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| {
                ext.chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .to_lowercase()
            })
            .unwrap_or_default();

        if ext.is_empty() {
            default.to_string()
        } else {
            ext
        }
    }
}

/// Collected multipart fields. The create endpoint requires `title` and
/// `video`; the update endpoint treats every field as optional. `tags` stays
/// `None` until a tags field appears, so updates can distinguish "leave tags
/// alone" from "replace with this (possibly empty) set".
#[derive(Debug, Default)]
pub struct VideoForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub visibility: Option<Visibility>,
    pub comments_enabled: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub video: Option<UploadedFile>,
    pub thumbnail: Option<UploadedFile>,
}

fn multipart_err(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::InvalidInput(format!("Malformed multipart body: {}", e))
}

async fn read_file(field: Field<'_>) -> Result<UploadedFile, AppError> {
    let filename = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let data = field.bytes().await.map_err(multipart_err)?.to_vec();

    Ok(UploadedFile {
        data,
        filename,
        content_type,
    })
}

/// Walk a multipart body into a [`VideoForm`]. Unknown fields are skipped.
pub async fn parse_video_form(mut multipart: Multipart) -> Result<VideoForm, AppError> {
    let mut form = VideoForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_err)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "title" => form.title = Some(field.text().await.map_err(multipart_err)?),
            "description" => {
                form.description = Some(field.text().await.map_err(multipart_err)?)
            }
            "visibility" => {
                let raw = field.text().await.map_err(multipart_err)?;
                let visibility = Visibility::from_str(raw.trim())
                    .map_err(AppError::InvalidInput)?;
                form.visibility = Some(visibility);
            }
            "commentsEnabled" => {
                let raw = field.text().await.map_err(multipart_err)?;
                let enabled = raw.trim().parse::<bool>().map_err(|_| {
                    AppError::InvalidInput(format!(
                        "commentsEnabled must be true or false, got '{}'",
                        raw.trim()
                    ))
                })?;
                form.comments_enabled = Some(enabled);
            }
            // Repeated field: one tag per occurrence.
            "tags" => {
                let tag = field.text().await.map_err(multipart_err)?;
                form.tags.get_or_insert_with(Vec::new).push(tag);
            }
            "videoFile" => form.video = Some(read_file(field).await?),
            "thumbnailFile" => form.thumbnail = Some(read_file(field).await?),
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(form)
}

/// Title/description/tag constraints shared by create and update.
pub fn validate_metadata(form: &VideoForm) -> Result<(), AppError> {
    if let Some(title) = form.title.as_deref() {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput("Title must not be empty".to_string()));
        }
        // Limits are character counts, matching the catalog's VARCHAR widths.
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(AppError::InvalidInput(format!(
                "Title exceeds {} characters",
                MAX_TITLE_LEN
            )));
        }
    }

    if let Some(description) = form.description.as_deref() {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(AppError::InvalidInput(format!(
                "Description exceeds {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }
    }

    if let Some(tags) = form.tags.as_deref() {
        for tag in tags {
            if tag.trim().chars().count() > MAX_TAG_LEN {
                return Err(AppError::InvalidInput(format!(
                    "Tag '{}' exceeds {} characters",
                    tag.trim(),
                    MAX_TAG_LEN
                )));
            }
        }
    }

    Ok(())
}

fn validate_file(
    file: &UploadedFile,
    expected_prefix: &str,
    max_bytes: usize,
    label: &str,
) -> Result<(), AppError> {
    if file.data.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "{} file must not be empty",
            label
        )));
    }

    let content_type = file.content_type.as_deref().unwrap_or("");
    if !content_type.starts_with(expected_prefix) {
        return Err(AppError::InvalidInput(format!(
            "{} content type must be {}*, got '{}'",
            label, expected_prefix, content_type
        )));
    }

    if file.data.len() > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "{} file is {} bytes; the limit is {} bytes",
            label,
            file.data.len(),
            max_bytes
        )));
    }

    Ok(())
}

pub fn validate_video_file(file: &UploadedFile, max_bytes: usize) -> Result<(), AppError> {
    validate_file(file, "video/", max_bytes, "Video")
}

pub fn validate_thumbnail_file(file: &UploadedFile, max_bytes: usize) -> Result<(), AppError> {
    validate_file(file, "image/", max_bytes, "Thumbnail")
}
