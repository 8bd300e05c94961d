use actix_files::NamedFile;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::files;

/// `/pages/pluginfile/{context}/{filearea}/{path..}`
pub async fn serve(
    req: HttpRequest,
    config: web::Data<AppConfig>,
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse, AppError> {
    let (context, filearea, args) = path.into_inner();
    let file = files::resolve(&config.files_dir, &context, &filearea, &args)?;
    let named = NamedFile::open_async(&file).await.map_err(|e| {
        log::warn!("Could not open {}: {e}", file.display());
        AppError::NotFound
    })?;
    Ok(named.into_response(&req))
}
