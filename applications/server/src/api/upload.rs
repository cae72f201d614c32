/// Multipart image upload parsing
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::http::{header, HeaderMap};
use bytes::Bytes;

/// Single file pulled out of a multipart body
#[derive(Debug)]
pub struct UploadedFile {
    pub data: Bytes,
    pub content_type: String,
    pub filename: String,
}

/// Read the file in `field_name` from a `multipart/form-data` body
///
/// The content type is taken from the part header, falling back to a guess
/// from the filename.
pub async fn read_file_field(
    headers: &HeaderMap,
    body: Bytes,
    field_name: &str,
    max_bytes: usize,
) -> Result<UploadedFile> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ServerError::BadRequest("Missing Content-Type".to_string()))?;

    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| ServerError::BadRequest("Expected multipart/form-data".to_string()))?;

    // Convert Bytes to a stream for multer
    let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let constraints = multer::Constraints::new()
        .size_limit(multer::SizeLimit::new().per_field(max_bytes as u64));
    let mut multipart = multer::Multipart::with_constraints(stream, boundary, constraints);

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(field_name) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map_or_else(
            || {
                mime_guess::from_path(&filename)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            },
            |mime| mime.essence_str().to_string(),
        );

        let data = field.bytes().await.map_err(multipart_error)?;

        return Ok(UploadedFile {
            data,
            content_type,
            filename,
        });
    }

    Err(ServerError::BadRequest(format!(
        "Missing '{field_name}' file field"
    )))
}

fn multipart_error(e: multer::Error) -> ServerError {
    match e {
        multer::Error::FieldSizeExceeded { limit, .. } => {
            ServerError::BadRequest(format!("Upload exceeds the {limit} byte limit"))
        }
        other => ServerError::BadRequest(format!("Failed to parse multipart: {other}")),
    }
}

/// Parse the named file field and hand it to the image store
pub async fn store_image(
    app_state: &AppState,
    headers: &HeaderMap,
    body: Bytes,
    field_name: &str,
) -> Result<String> {
    let file = read_file_field(headers, body, field_name, app_state.max_upload_bytes).await?;
    let size = file.data.len();

    app_state
        .image_store
        .upload_image(file.data, size, &file.content_type, &file.filename)
        .await
}
