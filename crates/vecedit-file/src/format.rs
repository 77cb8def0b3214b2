//! 声明的源文件格式

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclaredFormat {
    /// Adobe Illustrator
    Ai,
    /// Encapsulated PostScript
    Eps,
    /// CorelDRAW
    Cdr,
    Pdf,
}

impl DeclaredFormat {
    pub const ALL: [DeclaredFormat; 4] = [
        DeclaredFormat::Ai,
        DeclaredFormat::Eps,
        DeclaredFormat::Cdr,
        DeclaredFormat::Pdf,
    ];

    /// 小写标签（ai/eps/cdr/pdf）
    pub fn tag(&self) -> &'static str {
        match self {
            DeclaredFormat::Ai => "ai",
            DeclaredFormat::Eps => "eps",
            DeclaredFormat::Cdr => "cdr",
            DeclaredFormat::Pdf => "pdf",
        }
    }

    /// 按扩展名推断
    pub fn from_path(path: &Path) -> Result<Self, FileError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| FileError::UnsupportedFormat(path.display().to_string()))?;
        ext.parse()
    }
}

impl FromStr for DeclaredFormat {
    type Err = FileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "ai" => Ok(DeclaredFormat::Ai),
            "eps" | "ps" => Ok(DeclaredFormat::Eps),
            "cdr" => Ok(DeclaredFormat::Cdr),
            "pdf" => Ok(DeclaredFormat::Pdf),
            other => Err(FileError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for DeclaredFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag().to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!("AI".parse::<DeclaredFormat>().unwrap(), DeclaredFormat::Ai);
        assert_eq!(".eps".parse::<DeclaredFormat>().unwrap(), DeclaredFormat::Eps);
        assert!("dxf".parse::<DeclaredFormat>().is_err());
    }

    #[test]
    fn test_from_path() {
        let format = DeclaredFormat::from_path(Path::new("/tmp/logo.CDR")).unwrap();
        assert_eq!(format, DeclaredFormat::Cdr);
        assert_eq!(format.to_string(), "CDR");
        assert!(DeclaredFormat::from_path(Path::new("/tmp/noext")).is_err());
    }
}
