use crate::models::upload::UploadFile;
use anyhow::{Context, Result};
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从磁盘读取单个文件，准备上传
pub async fn load_upload_file(path: &Path) -> Result<UploadFile> {
    let content = fs::read(path)
        .await
        .with_context(|| format!("无法读取文件: {}", path.display()))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .with_context(|| format!("无效的文件路径: {}", path.display()))?;

    tracing::debug!("已读取 {} ({} 字节)", file_name, content.len());

    Ok(UploadFile::new(file_name, content))
}

/// 并发读取多个文件，任意一个失败则整体失败
pub async fn load_upload_files(paths: &[PathBuf]) -> Result<Vec<UploadFile>> {
    try_join_all(paths.iter().map(|path| load_upload_file(path))).await
}
