use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};

use super::FileService;
use crate::blob::validate_location;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::file_extension;

fn content_type_for(path: &str) -> &'static str {
    match file_extension(path).as_str() {
        ".pdf" => "application/pdf",
        ".docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ".txt" => "text/plain; charset=utf-8",
        ".md" => "text/markdown; charset=utf-8",
        ".csv" => "text/csv; charset=utf-8",
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".webp" => "image/webp",
        ".bmp" => "image/bmp",
        ".tif" | ".tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

pub async fn handle_download(
    service: &FileService,
    request: &HttpRequest,
    bucket: String,
    path: String,
) -> ActixResult<HttpResponse> {
    if let Err(e) = validate_location(&bucket, &path) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            e.message(),
        )));
    }

    let object_store = service.get_object_store(request);
    let data = match object_store.get(&bucket, &path).await {
        Ok(Some(data)) => data,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "File not found",
            )));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };

    let file_name = path.rsplit('/').next().unwrap_or_default();

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type_for(&path)))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{file_name}\""),
        ))
        .body(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("answer-keys/1_key.PDF"), "application/pdf");
        assert_eq!(content_type_for("worksheets/2/1_scan.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("blob"), "application/octet-stream");
    }
}
