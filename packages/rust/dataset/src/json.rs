//! JSON documents: the corpus file and the dictionary template.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use pharmacorpus_shared::{PharmaCorpusError, Result};

use crate::{OutputMeta, write_atomic};

/// Indentation used by every JSON file we emit.
const INDENT: &[u8] = b"    ";

/// Read and deserialize a UTF-8 JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| PharmaCorpusError::io(path, e))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| PharmaCorpusError::load(path, format!("invalid JSON: {e}")))?;
    debug!(path = %path.display(), bytes = content.len(), "read JSON file");
    Ok(value)
}

/// Write a JSON file with 4-space indentation; non-ASCII text is kept as-is.
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<OutputMeta> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    data.serialize(&mut ser)
        .map_err(|e| PharmaCorpusError::write(path, format!("JSON serialization failed: {e}")))?;
    write_atomic(path, &buf)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::temp_dir;

    #[test]
    fn writes_four_space_indent_and_unescaped_text() {
        let dir = temp_dir("pc-json");
        let path = dir.join("corpus.json");

        let mut data = BTreeMap::new();
        data.insert("dipirona sódica", vec!["novalgina"]);
        write_json(&path, &data).expect("write");

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n    \"dipirona sódica\": [\n        \"novalgina\"\n    ]\n}");

        let back: BTreeMap<String, Vec<String>> = read_json(&path).expect("read");
        assert_eq!(back["dipirona sódica"], vec!["novalgina".to_string()]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_json_is_load_error() {
        let dir = temp_dir("pc-json-bad");
        let path = dir.join("broken.json");
        std::fs::write(&path, "{\"a\": [").unwrap();

        let err = read_json::<serde_json::Value>(&path).unwrap_err();
        assert!(matches!(err, PharmaCorpusError::Load { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_json::<serde_json::Value>(Path::new("/nonexistent/pc/template.tap"))
            .unwrap_err();
        assert!(matches!(err, PharmaCorpusError::Io { .. }));
    }
}
