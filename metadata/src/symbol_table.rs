use std::collections::{HashMap, HashSet};

use anyhow::{Result, bail};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 字符映射项
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    #[schemars(title = "模型类别标签")]
    pub label: String,
    #[schemars(title = "车牌字符")]
    pub character: String,
}

/// 字符映射表
///
/// 模型类别标签到车牌字符的固定映射, 仅做精确匹配
#[derive(Debug, Clone)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    index: HashMap<String, usize>,
}

impl SymbolTable {
    /// 加载内置字符映射表
    pub fn new() -> Result<Self> {
        Self::from_yaml(include_str!("../symbols.yaml"))
    }

    /// 解析并校验字符映射表
    ///
    /// # 参数
    ///
    /// * `yaml` - 映射表内容
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let entries: Vec<SymbolEntry> = serde_yaml::from_str(yaml)?;
        Self::from_entries(entries)
    }

    /// 通过映射项构造映射表
    ///
    /// 每个字符必须为单个字符, 标签和字符均不允许重复
    ///
    /// # 参数
    ///
    /// * `entries` - 映射项
    pub fn from_entries(entries: Vec<SymbolEntry>) -> Result<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        let mut characters = HashSet::with_capacity(entries.len());

        for (i, entry) in entries.iter().enumerate() {
            if entry.character.chars().count() != 1 {
                bail!(
                    "标签 '{}' 映射的字符 '{}' 不是单个字符",
                    entry.label,
                    entry.character
                );
            }
            if index.insert(entry.label.clone(), i).is_some() {
                bail!("标签 '{}' 重复定义", entry.label);
            }
            if !characters.insert(entry.character.as_str()) {
                bail!("字符 '{}' 被多个标签映射", entry.character);
            }
        }

        Ok(Self { entries, index })
    }

    /// 查找标签对应的字符, 未收录的标签返回 `None`
    ///
    /// # 参数
    ///
    /// * `label` - 模型类别标签
    pub fn lookup(&self, label: &str) -> Option<&str> {
        self.index
            .get(label)
            .map(|&i| self.entries[i].character.as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// 所有映射项, 保持定义顺序
    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    /// 所有标签, 保持定义顺序
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
