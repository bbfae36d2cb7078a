use std::{fs, path::Path};

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::InputError;

/// 读取待识别的图片数据
///
/// # 参数
///
/// * `path` - 图片文件路径
/// * `base64` - 文件内容是否为 base64 编码文本
pub fn load_image_bytes(path: &Path, base64: bool) -> Result<Vec<u8>, InputError> {
    let bytes = fs::read(path).map_err(|e| InputError::Read(path.to_path_buf(), e))?;
    if !base64 {
        return Ok(bytes);
    }
    decode_base64(&String::from_utf8_lossy(&bytes))
}

/// 解码 base64 文本, 支持 `data:image/...;base64,` 前缀
///
/// # 参数
///
/// * `text` - base64 文本
pub fn decode_base64(text: &str) -> Result<Vec<u8>, InputError> {
    let text = text.trim();
    let payload = match text.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(rest, |(_, data)| data),
        None => text,
    };
    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(STANDARD.decode(payload)?)
}
