//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了文件缓存层，整个文件即一个缓存值。

use crate::error::Result;
use crate::tier::Tier;
use crate::value::BytesValue;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::{debug, instrument};

/// 文件缓存层
///
/// 读取时文件不存在或没有读写权限视为未命中；写入时整体覆盖文件
pub struct FileTier<V: BytesValue> {
    path: PathBuf,
    _value: PhantomData<fn() -> V>,
}

impl<V: BytesValue> FileTier<V> {
    /// 创建文件缓存层
    ///
    /// # 参数
    ///
    /// * `path` - 缓存文件路径
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _value: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<V: BytesValue> Clone for FileTier<V> {
    fn clone(&self) -> Self {
        Self::new(self.path.clone())
    }
}

impl<V: BytesValue> std::fmt::Debug for FileTier<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileTier").field("path", &self.path).finish()
    }
}

#[async_trait]
impl<V: BytesValue> Tier<V> for FileTier<V> {
    #[instrument(skip(self), level = "debug", fields(path = %self.path.display()))]
    async fn fetch(&self) -> Result<Option<V>> {
        // 以读写方式打开，同时检查存在性和读写权限
        let mut file = match fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .await
        {
            Ok(file) => file,
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
                debug!("File fetch: path={}, accessible=false", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).await?;
        debug!(
            "File fetch: path={}, value_len={}",
            self.path.display(),
            bytes.len()
        );
        V::from_bytes(bytes).map(Some)
    }

    #[instrument(skip(self, value), level = "debug", fields(path = %self.path.display()))]
    async fn store(&self, value: &V) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let bytes = value.as_bytes();
        fs::write(&self.path, bytes).await?;
        debug!(
            "File store: path={}, value_len={}",
            self.path.display(),
            bytes.len()
        );
        Ok(())
    }
}
