use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;

use crate::blob::{ObjectStore, StoredObject};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::{file_extension, validate_magic_bytes};

// 普通文本字段的最大长度
const MAX_FIELD_SIZE: usize = 64 * 1024;

/// 表单中的单个文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub async fn store(
        &self,
        object_store: &dyn ObjectStore,
        bucket: &str,
        path: &str,
    ) -> Result<StoredObject> {
        object_store.put(bucket, path, &self.data).await
    }
}

/// 解析后的 multipart 表单
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl UploadForm {
    /// 文本字段，空白值视为缺失
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

/// 读取 multipart 表单
///
/// `file_fields` 中的字段按文件处理，会校验扩展名、魔术字节与大小；其余字段按文本读取。
/// 校验失败时直接返回可用的错误响应。
pub async fn read_upload_form(
    mut payload: Multipart,
    file_fields: &[&str],
) -> std::result::Result<UploadForm, HttpResponse> {
    let config = AppConfig::get();
    let max_size = config.upload.max_size;
    let allowed_types = &config.upload.allowed_types;

    let mut form = UploadForm::default();

    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Malformed multipart payload: {}", e);
                return Err(bad_request(
                    ErrorCode::BadRequest,
                    format!("Malformed multipart payload: {e}"),
                ));
            }
        };

        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if !file_fields.contains(&name.as_str()) {
            let mut value = Vec::new();
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| {
                    bad_request(ErrorCode::BadRequest, format!("Failed to read field: {e}"))
                })?;
                if value.len() + data.len() > MAX_FIELD_SIZE {
                    return Err(bad_request(
                        ErrorCode::BadRequest,
                        format!("Field {name} is too large"),
                    ));
                }
                value.extend_from_slice(&data);
            }
            form.fields
                .insert(name, String::from_utf8_lossy(&value).into_owned());
            continue;
        }

        if form.files.contains_key(&name) {
            return Err(bad_request(
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded per field",
            ));
        }

        let file_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string())
            .unwrap_or_default();

        // 提取扩展名并校验
        let extension = file_extension(&file_name);
        if !allowed_types.iter().any(|t| t.to_lowercase() == extension) {
            return Err(bad_request(
                ErrorCode::FileTypeNotAllowed,
                "File type not allowed",
            ));
        }

        let content_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| {
                HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::FileUploadFailed,
                    format!("Failed to read file: {e}"),
                ))
            })?;
            // 校验大小
            if data.len() + chunk.len() > max_size {
                return Err(HttpResponse::PayloadTooLarge().json(ApiResponse::error_empty(
                    ErrorCode::FileSizeExceeded,
                    "File size exceeds the limit",
                )));
            }
            data.extend_from_slice(&chunk);
        }

        if !validate_magic_bytes(&data, &extension) {
            return Err(bad_request(
                ErrorCode::FileTypeNotAllowed,
                "File content does not match its extension",
            ));
        }

        tracing::debug!("Received file {} ({} bytes) in field {}", file_name, data.len(), name);
        form.files.insert(
            name,
            UploadedFile {
                file_name,
                content_type,
                data,
            },
        );
    }

    Ok(form)
}

#[cfg(test)]
pub(crate) mod test_support {
    use actix_web::http::header::CONTENT_TYPE;
    use actix_web::test::TestRequest;

    pub const BOUNDARY: &str = "----tutorhub-test-boundary";

    /// 构造 multipart 请求体
    pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        for (name, file_name, data) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    pub fn multipart_request(
        request: TestRequest,
        fields: &[(&str, &str)],
        files: &[(&str, &str, &[u8])],
    ) -> TestRequest {
        request
            .insert_header((
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body(fields, files))
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::multipart_request;
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    async fn echo(payload: Multipart) -> HttpResponse {
        match read_upload_form(payload, &["file"]).await {
            Ok(mut form) => {
                let title = form.field("title").unwrap_or("-").to_string();
                let file = form
                    .take_file("file")
                    .map(|f| format!("{}:{}", f.file_name, f.data.len()))
                    .unwrap_or_else(|| "none".to_string());
                HttpResponse::Ok().body(format!("{title}|{file}"))
            }
            Err(resp) => resp,
        }
    }

    #[actix_web::test]
    async fn test_reads_fields_and_files() {
        let app = test::init_service(App::new().route("/", web::post().to(echo))).await;

        let req = multipart_request(
            test::TestRequest::post().uri("/"),
            &[("title", " Fractions quiz ")],
            &[("file", "answers.txt", b"1. 3/4")],
        )
        .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "Fractions quiz|answers.txt:6");

        let req = multipart_request(test::TestRequest::post().uri("/"), &[("title", "  ")], &[])
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "-|none");
    }

    #[actix_web::test]
    async fn test_rejects_disallowed_or_mismatched_files() {
        let app = test::init_service(App::new().route("/", web::post().to(echo))).await;

        let req = multipart_request(
            test::TestRequest::post().uri("/"),
            &[],
            &[("file", "run.exe", b"MZ")],
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let req = multipart_request(
            test::TestRequest::post().uri("/"),
            &[],
            &[("file", "fake.pdf", b"not a pdf")],
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let req = multipart_request(
            test::TestRequest::post().uri("/"),
            &[],
            &[("file", "a.txt", b"one"), ("file", "b.txt", b"two")],
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }
}
