use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One hit returned by the web-search provider. Lives for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl RawResult {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

/// Where a candidate record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateSource {
    Aggregator,
    Github,
    Devto,
    Npi,
    PostJobFree,
}

/// Document type requested in an X-Ray search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    #[default]
    Pdf,
    Doc,
    Docx,
    All,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Doc => "doc",
            FileType::Docx => "docx",
            FileType::All => "all",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "pdf" => Ok(FileType::Pdf),
            "doc" => Ok(FileType::Doc),
            "docx" => Ok(FileType::Docx),
            "all" => Ok(FileType::All),
            other => Err(format!("unsupported filetype '{other}'")),
        }
    }
}

/// Final unit handed to the UI: search-hit fields plus the extracted identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub title: String,
    pub location: String,
    pub bio: String,
    pub profile_url: String,
    pub source: CandidateSource,
    pub file_type: FileType,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}
