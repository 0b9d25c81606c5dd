//! Result document loading.
//!
//! Some runtimes print startup logs before the JSON dump, so the loader skips
//! to the first `{` or `[` and decodes a single JSON value from there,
//! ignoring anything that follows it.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::ReportError;

/// One key/value mapping of a result document.
pub type Section = Map<String, Value>;

/// A decoded result document.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// The whole document is one mapping.
    Mapping(Section),
    /// The document is a sequence of mappings; non-mapping items are dropped.
    Sections(Vec<Section>),
}

impl Document {
    /// Every section of the document, in document order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        let slice: &[Section] = match self {
            Document::Mapping(map) => std::slice::from_ref(map),
            Document::Sections(sections) => sections,
        };
        slice.iter()
    }
}

/// Decode a document from raw text that may carry a non-JSON preamble.
pub fn load(raw_text: &str) -> Result<Document, ReportError> {
    if raw_text.trim().is_empty() {
        return Err(ReportError::malformed("empty document"));
    }

    let start = [raw_text.find('{'), raw_text.find('[')]
        .into_iter()
        .flatten()
        .min()
        .ok_or_else(|| ReportError::malformed("no JSON object or array found"))?;

    if start > 0 {
        log::debug!("Skipping {start} bytes of preamble before JSON");
    }

    let mut stream = serde_json::Deserializer::from_str(&raw_text[start..]).into_iter::<Value>();
    let value = match stream.next() {
        Some(Ok(value)) => value,
        Some(Err(e)) => return Err(ReportError::malformed(e.to_string())),
        None => return Err(ReportError::malformed("no JSON value after preamble")),
    };

    match value {
        Value::Object(map) => Ok(Document::Mapping(map)),
        Value::Array(items) => {
            let total = items.len();
            let sections: Vec<Section> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect();
            if sections.len() < total {
                log::debug!(
                    "Ignoring {} non-mapping items in top-level sequence",
                    total - sections.len()
                );
            }
            Ok(Document::Sections(sections))
        }
        // Unreachable in practice: decoding starts at `{` or `[`
        other => Err(ReportError::malformed(format!(
            "expected a mapping or a sequence, found {other}"
        ))),
    }
}

/// Read and decode a document from disk.
///
/// An unreadable file is a `MissingInput`; undecodable content is a
/// `MalformedInput` tagged with the path.
pub fn load_file(path: &Path) -> Result<Document, ReportError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        log::debug!("Failed to read {}: {e}", path.display());
        ReportError::MissingInput {
            file: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            searched: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        }
    })?;
    load(&text).map_err(|e| e.at(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_mapping() {
        let doc = load(r#"{"worker": []}"#).unwrap();
        let Document::Mapping(map) = doc else {
            panic!("expected mapping");
        };
        assert_eq!(map.get("worker"), Some(&json!([])));
    }

    #[test]
    fn test_preamble_is_ignored() {
        let text = "Deno 2.1 starting\nclk: ~3.2 GHz\n{\"knitting\": [{\"name\": \"a (1)\"}]}";
        let doc = load(text).unwrap();
        assert_eq!(doc.sections().count(), 1);
        let section = doc.sections().next().unwrap();
        assert!(section.contains_key("knitting"));
    }

    #[test]
    fn test_trailing_output_is_ignored() {
        let doc = load("[{\"a\": 1}]\nrun finished in 3s\n").unwrap();
        assert_eq!(doc, Document::Sections(vec![json!({"a": 1}).as_object().unwrap().clone()]));
    }

    #[test]
    fn test_sections_drop_non_mappings() {
        let doc = load(r#"[{"a": 1}, 3, "x", {"b": 2}]"#).unwrap();
        let keys: Vec<&String> = doc.sections().flat_map(|s| s.keys()).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn test_earliest_delimiter_wins() {
        // `[` appears first, so the sequence is decoded rather than the inner object
        let doc = load(r#"junk [{"a": 1}]"#).unwrap();
        assert!(matches!(doc, Document::Sections(_)));
    }

    #[rstest]
    #[case("")]
    #[case("   \n\t ")]
    #[case("no json here")]
    #[case("log line [info] {broken")]
    #[case("{\"a\": ")]
    fn test_malformed(#[case] text: &str) {
        assert!(matches!(
            load(text),
            Err(ReportError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_load_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("node_ipc.json")).unwrap_err();
        assert!(
            matches!(err, ReportError::MissingInput { ref file, .. } if file == "node_ipc.json")
        );
    }

    #[test]
    fn test_load_file_malformed_carries_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bun_ipc.json");
        std::fs::write(&path, "  \n").unwrap();
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, ReportError::MalformedInput { path: Some(ref p), .. } if *p == path));
    }
}
