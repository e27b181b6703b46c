//! Serializable view of a finalized request sequence.

use plugreq_core::PluginRequests;
use serde::Serialize;

/// One finalized request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestEntry {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub apply: bool,
    pub line: u32,
}

/// The requests of one script, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestReport {
    pub script: String,
    pub requests: Vec<RequestEntry>,
}

impl RequestReport {
    pub fn new(script: impl Into<String>, requests: &PluginRequests) -> Self {
        Self {
            script: script.into(),
            requests: requests
                .iter()
                .map(|request| RequestEntry {
                    id: request.id().to_string(),
                    version: request.version().map(str::to_owned),
                    apply: request.apply(),
                    line: request.line_number(),
                })
                .collect(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use plugreq_core::NamedScriptSource;

    use super::*;
    use crate::{BlockHost, Declaration, PluginsBlock};

    #[test]
    fn test_report_json() {
        let block = PluginsBlock::new(NamedScriptSource::new("settings"), 1)
            .declare(Declaration::new("a").at_line(2))
            .declare(Declaration::new("b").version("2.0").apply(false).at_line(3));
        let requests = BlockHost::default().evaluate(&block).unwrap();

        let report = RequestReport::new("settings", &requests);
        let value: serde_json::Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "script": "settings",
                "requests": [
                    { "id": "a", "apply": true, "line": 2 },
                    { "id": "b", "version": "2.0", "apply": false, "line": 3 },
                ]
            })
        );
    }

    #[test]
    fn test_empty_report() {
        let report = RequestReport::new("settings", &PluginRequests::empty());
        assert!(report.requests.is_empty());
    }
}
