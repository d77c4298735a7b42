//! UWS status-document parsing
//!
//! Both the TAP service and the VOSpace transfer servlet report job state as
//! a small XML job summary with a namespace-prefixed `phase` element and,
//! usually, a `jobId` element. Elements are matched by local name so the
//! parser does not care which prefix (or namespace URI) a service binds.
//!
//! The two failure behaviors are deliberately distinct: a document without a
//! phase element is malformed and must stop the poll loop immediately, while
//! a phase *value* this client does not recognize is tolerated as
//! [`JobPhase::Unknown`] and polling continues.

use thiserror::Error;

use crate::domain::job::JobPhase;

/// A status document that could not be understood at all
///
/// Terminal and non-retryable: continuing to poll on garbage input would
/// spin forever against a broken or misaddressed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UwsParseError {
    #[error("status document is not well-formed XML: {0}")]
    InvalidXml(String),
    #[error("status document has no phase element")]
    MissingPhase,
}

/// Parsed view of a UWS job summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDocument {
    pub phase: JobPhase,
    pub job_id: Option<String>,
}

impl StatusDocument {
    /// Parse a status document from its XML text
    pub fn parse(text: &str) -> Result<Self, UwsParseError> {
        let doc = roxmltree::Document::parse(text)
            .map_err(|e| UwsParseError::InvalidXml(e.to_string()))?;

        let phase_text = doc
            .descendants()
            .find(|n| n.is_element() && n.tag_name().name() == "phase")
            .and_then(|n| n.text())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(UwsParseError::MissingPhase)?;

        let job_id = doc
            .descendants()
            .find(|n| n.is_element() && n.tag_name().name() == "jobId")
            .and_then(|n| n.text())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            phase: JobPhase::from_wire(phase_text),
            job_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(phase: &str, job_id: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<uws:job xmlns:uws="http://www.ivoa.net/xml/UWS/v1.0">
    <uws:jobId>{job_id}</uws:jobId>
    <uws:phase>{phase}</uws:phase>
</uws:job>"#
        )
    }

    #[test]
    fn test_parses_phase_and_job_id() {
        let doc = StatusDocument::parse(&summary("EXECUTING", "145950452462I")).unwrap();
        assert_eq!(doc.phase, JobPhase::Executing);
        assert_eq!(doc.job_id.as_deref(), Some("145950452462I"));
    }

    #[test]
    fn test_prefix_does_not_matter() {
        let doc = StatusDocument::parse(
            r#"<job xmlns="http://www.ivoa.net/xml/UWS/v1.0"><phase>COMPLETED</phase></job>"#,
        )
        .unwrap();
        assert_eq!(doc.phase, JobPhase::Completed);
        assert_eq!(doc.job_id, None);
    }

    #[test]
    fn test_unrecognized_phase_is_unknown_not_error() {
        let doc = StatusDocument::parse(&summary("HELD", "7")).unwrap();
        assert_eq!(doc.phase, JobPhase::Unknown);
    }

    #[test]
    fn test_missing_phase_is_malformed() {
        let err = StatusDocument::parse(
            r#"<uws:job xmlns:uws="http://www.ivoa.net/xml/UWS/v1.0"><uws:jobId>7</uws:jobId></uws:job>"#,
        )
        .unwrap_err();
        assert_eq!(err, UwsParseError::MissingPhase);
    }

    #[test]
    fn test_empty_phase_is_malformed() {
        let err = StatusDocument::parse(&summary("", "7")).unwrap_err();
        assert_eq!(err, UwsParseError::MissingPhase);
    }

    #[test]
    fn test_non_xml_body_is_malformed() {
        let err = StatusDocument::parse("<html>502 Bad Gateway").unwrap_err();
        assert!(matches!(err, UwsParseError::InvalidXml(_)));
    }
}
