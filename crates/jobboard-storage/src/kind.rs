//! Accepted resume formats.

use std::path::Path;

use serde::Serialize;

/// Fallback content type for anything not recognised.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A resume format, identified by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeKind {
    Pdf,
    Doc,
    Docx,
}

impl ResumeKind {
    /// Identify a resume by extension, case-insensitively.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(ResumeKind::Pdf),
            "doc" => Some(ResumeKind::Doc),
            "docx" => Some(ResumeKind::Docx),
            _ => None,
        }
    }

    /// Extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ResumeKind::Pdf => ".pdf",
            ResumeKind::Doc => ".doc",
            ResumeKind::Docx => ".docx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ResumeKind::Pdf => "application/pdf",
            ResumeKind::Doc => "application/msword",
            ResumeKind::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        }
    }
}

/// Content type for serving `name` inline.
pub fn content_type_for(name: &str) -> &'static str {
    ResumeKind::from_file_name(name)
        .map(|k| k.content_type())
        .unwrap_or(OCTET_STREAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_name() {
        assert_eq!(ResumeKind::from_file_name("cv.pdf"), Some(ResumeKind::Pdf));
        assert_eq!(ResumeKind::from_file_name("CV.DOCX"), Some(ResumeKind::Docx));
        assert_eq!(ResumeKind::from_file_name("a.b.doc"), Some(ResumeKind::Doc));
        assert_eq!(ResumeKind::from_file_name("setup.exe"), None);
        assert_eq!(ResumeKind::from_file_name("pdf"), None);
        assert_eq!(ResumeKind::from_file_name(""), None);
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for("x.pdf"), "application/pdf");
        assert_eq!(content_type_for("x.doc"), "application/msword");
        assert!(content_type_for("x.docx").ends_with("wordprocessingml.document"));
        assert_eq!(content_type_for("x.txt"), OCTET_STREAM);
    }
}
