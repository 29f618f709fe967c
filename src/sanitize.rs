//! HTML/script stripping applied to every JSON request body.
//!
//! Handlers never see raw bodies: [`SanitizedJson`] parses the body into a
//! JSON value, strips markup from every string in it, and only then
//! deserializes the handler's payload type.

use crate::errors::AppError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::LazyLock;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<\s*(script|style)\b[^>]*>.*?<\s*/\s*(script|style)\s*>")
        .expect("script block pattern is valid")
});

// A tag must open with a name, `/` or `!` right after `<`, so "a < b" survives.
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[a-zA-Z!][^<>]*>").expect("tag pattern is valid"));

// Whatever is left of an unterminated tag opener after stripping.
static DANGLING_OPENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([a-zA-Z/!])").expect("opener pattern is valid"));

/// Removes `<script>`/`<style>` blocks together with their content, then every remaining tag.
///
/// Both passes repeat until nothing changes, since removing an inner tag can
/// join the pieces of an outer one (`<<b>script>`). Any `<` still followed by
/// a letter, `/` or `!` is escaped as `&lt;`, so the output never opens a tag.
pub fn strip_markup(input: &str) -> String {
    if !input.contains('<') {
        return input.to_string();
    }

    let mut current = input.to_string();
    loop {
        let without_blocks = SCRIPT_BLOCK.replace_all(&current, "");
        let stripped = TAG.replace_all(&without_blocks, "").into_owned();
        if stripped == current {
            break;
        }
        current = stripped;
    }

    DANGLING_OPENER.replace_all(&current, "&lt;$1").into_owned()
}

/// Applies [`strip_markup`] to every string in `value`, at any depth. Keys are left alone.
pub fn sanitize_value(value: &mut Value) {
    match value {
        Value::String(s) => {
            let cleaned = strip_markup(s);
            if cleaned != *s {
                *s = cleaned;
            }
        }
        Value::Array(items) => items.iter_mut().for_each(sanitize_value),
        Value::Object(map) => map.values_mut().for_each(sanitize_value),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// JSON body extractor that sanitizes before deserializing.
#[derive(Debug, Clone)]
pub struct SanitizedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for SanitizedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::warn!("Rejected request body: {}", rejection.body_text());
                AppError::BadRequest(rejection.body_text())
            })?;

        sanitize_value(&mut value);

        let payload = serde_json::from_value(value).map_err(|e| {
            tracing::warn!("Request body has the wrong shape: {}", e);
            AppError::Unprocessable(format!("Invalid request body: {}", e))
        })?;

        Ok(Self(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(strip_markup("Hello, world"), "Hello, world");
        assert_eq!(strip_markup("a < b and c > d"), "a < b and c > d");
    }

    #[test]
    fn test_script_removed_with_content() {
        assert_eq!(
            strip_markup("Hi<script type=\"text/javascript\">alert('x')</script> there"),
            "Hi there"
        );
        assert_eq!(strip_markup("<SCRIPT>\nsteal()\n</SCRIPT >ok"), "ok");
    }

    #[test]
    fn test_tags_stripped_text_kept() {
        assert_eq!(
            strip_markup("<b>bold</b> and <a href=\"javascript:x()\">link</a>"),
            "bold and link"
        );
        assert_eq!(strip_markup("<img src=x onerror=alert(1)>"), "");
    }

    #[test]
    fn test_nested_tags_cannot_rebuild_markup() {
        assert_eq!(strip_markup("<<b>script>alert(1)<</b>/script>"), "");
        assert_eq!(strip_markup("ok<<b>i>x"), "okx");
        assert_eq!(strip_markup("<scr<b></b>ipt>x()</script>"), "x()");
    }

    #[test]
    fn test_unterminated_tags_are_escaped() {
        assert_eq!(strip_markup("hi <script"), "hi &lt;script");
        assert_eq!(strip_markup("<!--"), "&lt;!--");
        assert_eq!(strip_markup("1 <2"), "1 <2");
    }

    #[test]
    fn test_sanitize_value_recurses() {
        let mut value = json!({
            "name": "<i>Ada</i>",
            "tags": ["<b>x</b>", 3],
            "nested": { "note": "<script>bad()</script>fine" },
            "latitude": 28.6,
            "flag": true
        });
        sanitize_value(&mut value);
        assert_eq!(
            value,
            json!({
                "name": "Ada",
                "tags": ["x", 3],
                "nested": { "note": "fine" },
                "latitude": 28.6,
                "flag": true
            })
        );
    }
}
