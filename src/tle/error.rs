use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TleError {
    #[error("line {line}: expected 69 characters, found {found}")]
    Length { line: u8, found: usize },
    #[error("line {line}: missing '{line} ' line number marker")]
    LineNumber { line: u8 },
    #[error("line {line}: checksum mismatch (stated {stated}, computed {computed})")]
    Checksum { line: u8, stated: u8, computed: u8 },
    #[error("line {line}: invalid {field} '{value}'")]
    Field {
        line: u8,
        field: &'static str,
        value: String,
    },
    #[error("catalog number differs between lines ({line1} vs {line2})")]
    CatalogMismatch { line1: u32, line2: u32 },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("TLE directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
}
