//! ADQL query specification

use serde::{Deserialize, Serialize};

/// An ADQL query to be submitted as an asynchronous TAP job
///
/// Immutable once submitted; the client encodes it into the url-encoded
/// form the UWS job-creation endpoint expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Query text (ADQL)
    pub text: String,
    /// Requested result serialization, `csv` by convention
    pub format: String,
    /// Human-readable job name
    pub name: String,
    /// Human-readable job description
    pub description: String,
}

impl QuerySpec {
    /// Create a query spec with default format, name and description
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: "csv".to_string(),
            name: "myQuery".to_string(),
            description: "voflow query".to_string(),
        }
    }

    /// Set the requested result format
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Set the job name shown by the remote service
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the job description shown by the remote service
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Form pairs for the job-creation POST
    ///
    /// `PHASE=RUN` asks the service to start executing immediately instead
    /// of leaving the job pending until a separate phase update.
    pub fn to_form(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("REQUEST", "doQuery"),
            ("LANG", "ADQL"),
            ("FORMAT", &self.format),
            ("PHASE", "RUN"),
            ("JOBNAME", &self.name),
            ("JOBDESCRIPTION", &self.description),
            ("QUERY", &self.text),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let spec = QuerySpec::new("SELECT 1");
        assert_eq!(spec.text, "SELECT 1");
        assert_eq!(spec.format, "csv");
    }

    #[test]
    fn test_form_pairs() {
        let spec = QuerySpec::new("SELECT TOP 5 * FROM catalogue")
            .with_format("votable")
            .with_name("top5");
        let form = spec.to_form();
        assert_eq!(form[0], ("REQUEST", "doQuery"));
        assert_eq!(form[1], ("LANG", "ADQL"));
        assert_eq!(form[2], ("FORMAT", "votable"));
        assert_eq!(form[3], ("PHASE", "RUN"));
        assert_eq!(form[4], ("JOBNAME", "top5"));
        assert_eq!(form[6], ("QUERY", "SELECT TOP 5 * FROM catalogue"));
    }
}
