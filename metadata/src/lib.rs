mod config;
mod symbol_table;

pub use config::{InputMode, ModelConfig, ReadingOrder, RecognizerConfig};
pub use symbol_table::{SymbolEntry, SymbolTable};

lazy_static::lazy_static! {
    /// 内置字符映射表
    pub static ref SYMBOL_TABLE: SymbolTable =
        SymbolTable::new().expect("内置字符映射表格式错误");
}
