use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("读取图片文件 {0} 失败: {1}")]
    Read(PathBuf, io::Error),
    #[error("base64 解码失败: {0}")]
    Base64(#[from] base64::DecodeError),
}
