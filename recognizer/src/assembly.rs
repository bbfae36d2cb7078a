use metadata::{ReadingOrder, SymbolTable};

use crate::adapter::RawDetection;

/// 带水平位置的车牌字符
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedCharacter {
    pub character: String,
    pub anchor_x: f32,
}

/// 车牌文本拼接器
///
/// 按检测框水平中点排序字符, 以单个空格连接. 不保留任何跨调用状态
#[derive(Debug, Clone)]
pub struct Assembler<'a> {
    symbols: &'a SymbolTable,
    reading_order: ReadingOrder,
    no_text: String,
}

impl<'a> Assembler<'a> {
    /// 创建拼接器
    ///
    /// # 参数
    ///
    /// * `symbols` - 字符映射表
    /// * `reading_order` - 字符排序方向
    /// * `no_text` - 未识别到字符时返回的文本
    pub fn new(
        symbols: &'a SymbolTable,
        reading_order: ReadingOrder,
        no_text: impl Into<String>,
    ) -> Self {
        Self {
            symbols,
            reading_order,
            no_text: no_text.into(),
        }
    }

    pub fn no_text(&self) -> &str {
        &self.no_text
    }

    /// 过滤未收录的标签, 并计算每个字符的水平中点
    ///
    /// # 参数
    ///
    /// * `detections` - 检测结果
    pub fn position(&self, detections: &[RawDetection]) -> Vec<PositionedCharacter> {
        detections
            .iter()
            .filter_map(|detection| {
                self.symbols
                    .lookup(&detection.class_label)
                    .map(|character| PositionedCharacter {
                        character: character.to_string(),
                        anchor_x: detection.bounding_box.center_x(),
                    })
            })
            .collect()
    }

    /// 拼接车牌文本
    ///
    /// 位置相同的字符保持检测顺序, 重复字符不去重
    ///
    /// # 参数
    ///
    /// * `detections` - 检测结果
    pub fn assemble(&self, detections: &[RawDetection]) -> String {
        let mut characters = self.position(detections);
        if characters.is_empty() {
            return self.no_text.clone();
        }

        // sort_by 为稳定排序
        match self.reading_order {
            ReadingOrder::LeftToRight => {
                characters.sort_by(|a, b| a.anchor_x.total_cmp(&b.anchor_x))
            }
            ReadingOrder::RightToLeft => {
                characters.sort_by(|a, b| b.anchor_x.total_cmp(&a.anchor_x))
            }
        }

        characters
            .iter()
            .map(|c| c.character.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
