//! JSON evaluator output to a YAML document stream

use hfnix_core::ConfigValue;

use crate::error::{EngineError, Result};

/// Separator between documents in a YAML stream
pub const DOCUMENT_SEPARATOR: &str = "---\n";

/// Convert a JSON array of documents into a multi-document YAML string
///
/// `hook` runs on each document before it is serialized; an error from the
/// hook aborts the conversion.
pub fn json_to_yaml_documents<F>(json: &[u8], mut hook: F) -> Result<String>
where
    F: FnMut(&mut ConfigValue) -> Result<()>,
{
    let documents: Vec<ConfigValue> = serde_json::from_slice(json)
        .map_err(|source| EngineError::InvalidEvaluatorOutput { source })?;

    let mut output = String::new();
    for (index, mut document) in documents.into_iter().enumerate() {
        hook(&mut document)?;

        if index > 0 {
            output.push_str(DOCUMENT_SEPARATOR);
        }
        output.push_str(&to_yaml_document(&document)?);
    }

    Ok(output)
}

/// Serialize a single document
pub fn to_yaml_document(document: &ConfigValue) -> Result<String> {
    Ok(serde_yaml::to_string(document)?)
}
