mod path;

use serde_json::Value;
use thiserror::Error;

use crate::http::ResponseCapture;

pub use path::{FieldPath, FieldPathError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("response body is not valid JSON ({message}): {preview}")]
    MalformedBody { message: String, preview: String },
    #[error("path `{path}` not found: missing segment `{segment}`")]
    PathNotFound { path: String, segment: String },
}

/// Owned copy of the value at `path`.
pub fn extract(capture: &ResponseCapture, path: &FieldPath) -> Result<Value, ExtractError> {
    extract_ref(capture, path).cloned()
}

pub fn extract_ref<'a>(
    capture: &'a ResponseCapture,
    path: &FieldPath,
) -> Result<&'a Value, ExtractError> {
    let document = capture.json()?;
    resolve(document, path)
}

/// Walks `path` through an already parsed document.
pub fn resolve<'a>(document: &'a Value, path: &FieldPath) -> Result<&'a Value, ExtractError> {
    let mut current = document;
    for segment in path.segments() {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index)),
            _ => None,
        };
        current = next.ok_or_else(|| ExtractError::PathNotFound {
            path: path.to_string(),
            segment: segment.clone(),
        })?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn capture(body: &str) -> ResponseCapture {
        ResponseCapture::new(200, Vec::new(), body.as_bytes().to_vec())
    }

    fn path(raw: &str) -> FieldPath {
        FieldPath::parse(raw).unwrap()
    }

    const USER: &str = r#"{"data":{"id":2,"email":"janet.weaver@reqres.in","first_name":"Janet","last_name":"Weaver"},"support":{"text":"hi"}}"#;

    #[test]
    fn extracts_nested_values() {
        let capture = capture(USER);
        assert_eq!(extract(&capture, &path("data.id")).unwrap(), json!(2));
        assert_eq!(
            extract(&capture, &path("data.first_name")).unwrap(),
            json!("Janet")
        );
    }

    #[test]
    fn root_path_returns_whole_document() {
        let capture = capture(r#"{"token":"abc"}"#);
        assert_eq!(
            extract(&capture, &FieldPath::root()).unwrap(),
            json!({"token": "abc"})
        );
    }

    #[test]
    fn indexes_into_arrays() {
        let capture = capture(r#"{"data":[{"id":7},{"id":8}]}"#);
        assert_eq!(extract(&capture, &path("data.1.id")).unwrap(), json!(8));
    }

    #[test]
    fn names_first_missing_segment() {
        let capture = capture(USER);
        let err = extract(&capture, &path("data.avatar.url")).unwrap_err();
        assert_eq!(
            err,
            ExtractError::PathNotFound {
                path: "data.avatar.url".to_string(),
                segment: "avatar".to_string(),
            }
        );
    }

    #[test]
    fn scalar_in_the_middle_is_not_traversed() {
        let capture = capture(USER);
        let err = extract(&capture, &path("data.id.value")).unwrap_err();
        assert!(matches!(err, ExtractError::PathNotFound { segment, .. } if segment == "value"));
    }

    #[test]
    fn null_value_is_returned_not_defaulted() {
        let capture = capture(r#"{"error":null}"#);
        assert_eq!(extract(&capture, &path("error")).unwrap(), Value::Null);
    }

    #[test]
    fn malformed_body_fails_on_lookup() {
        let capture = capture("not json");
        let err = extract(&capture, &path("token")).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedBody { .. }));
    }

    #[test]
    fn empty_body_is_malformed() {
        let capture = capture("");
        assert!(matches!(
            extract(&capture, &FieldPath::root()),
            Err(ExtractError::MalformedBody { .. })
        ));
    }
}
