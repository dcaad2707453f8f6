use std::{
    fs,
    path::{Path, PathBuf},
};

use shared::domain::StyleId;
use tracing::info;

use crate::{client::ResultImage, error::DownloadError};

pub fn result_file_name(style: StyleId) -> String {
    format!("{style}-art.png")
}

pub fn save_result(
    dir: &Path,
    style: StyleId,
    image: &ResultImage,
) -> Result<PathBuf, DownloadError> {
    let path = dir.join(result_file_name(style));
    let write_error = |source| DownloadError::Write {
        path: path.display().to_string(),
        source,
    };

    fs::create_dir_all(dir).map_err(write_error)?;
    fs::write(&path, image.bytes()).map_err(write_error)?;
    info!(path = %path.display(), size_bytes = image.bytes().len(), "download: result saved");
    Ok(path)
}
