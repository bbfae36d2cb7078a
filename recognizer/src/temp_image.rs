use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use uuid::Uuid;

/// 临时图片文件
///
/// 文件名由随机 UUID 生成, 释放时删除文件, 删除失败仅记录日志
#[derive(Debug)]
pub struct TempImage {
    path: PathBuf,
}

impl TempImage {
    /// 将图片数据写入临时目录
    ///
    /// # 参数
    ///
    /// * `dir` - 临时目录
    /// * `bytes` - 图片数据
    /// * `extension` - 文件扩展名
    pub fn create(dir: &Path, bytes: &[u8], extension: &str) -> Result<Self> {
        let path = dir.join(format!("plate-{}.{}", Uuid::new_v4(), extension));
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .with_context(|| format!("创建临时文件 {} 失败", path.display()))?;

        // 先交给守卫, 写入失败时同样会被删除
        let temp = Self { path };
        Self::fill(file, bytes)
            .with_context(|| format!("写入临时文件 {} 失败", temp.path.display()))?;

        debug!("已创建临时文件 {}", temp.path.display());
        Ok(temp)
    }

    /// 写入数据, 返回前关闭文件句柄
    fn fill(mut file: File, bytes: &[u8]) -> io::Result<()> {
        file.write_all(bytes)?;
        file.flush()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(_) => debug!("已删除临时文件 {}", self.path.display()),
            Err(e) => warn!("删除临时文件 {} 失败: {}", self.path.display(), e),
        }
    }
}
