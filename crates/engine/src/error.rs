use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// Malformed export markup. Fatal: no partial results.
    ExportParse { position: u64, detail: String },
    /// Authority line with too few fields.
    AuthorityLine { line: usize, content: String },
    /// Authority date that does not parse as `%Y-%m-%d`.
    AuthorityDate { line: usize, value: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExportParse { position, detail } => {
                write!(f, "export parse error at byte {position}: {detail}")
            }
            Self::AuthorityLine { line, content } => {
                write!(f, "authority line {line}: expected at least 4 colon-separated fields, got '{content}'")
            }
            Self::AuthorityDate { line, value } => {
                write!(f, "authority line {line}: cannot parse date '{value}'")
            }
        }
    }
}

impl std::error::Error for EngineError {}
