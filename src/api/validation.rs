//! Request body validation for item creation.
//!
//! Item payloads are checked here, before the registry sees them. Every
//! violating field is reported, each with its location in the request and a
//! machine-readable kind.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::registry::types::{
    NewItem, DESCRIPTION_MAX_LENGTH, NAME_MAX_LENGTH, NAME_MIN_LENGTH,
};

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    /// Required field absent.
    Missing,
    /// Value is not a string.
    StringType,
    /// String shorter than allowed.
    StringTooShort,
    /// String longer than allowed.
    StringTooLong,
    /// Body is not valid JSON.
    JsonInvalid,
    /// Body is JSON but not an object.
    ModelAttributesType,
}

impl ValidationKind {
    fn default_message(self) -> &'static str {
        match self {
            ValidationKind::Missing => "Field required",
            ValidationKind::StringType => "Input should be a valid string",
            ValidationKind::StringTooShort => "String is too short",
            ValidationKind::StringTooLong => "String is too long",
            ValidationKind::JsonInvalid => "JSON decode error",
            ValidationKind::ModelAttributesType => {
                "Input should be a valid dictionary or object to extract fields from"
            }
        }
    }
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Path to the offending value, e.g. `["body", "name"]`.
    pub loc: Vec<String>,
    /// Machine-readable reason.
    #[serde(rename = "type")]
    pub kind: ValidationKind,
    /// Human-readable reason.
    pub msg: String,
}

impl FieldError {
    /// Error about the request body as a whole.
    pub fn body(kind: ValidationKind) -> Self {
        Self {
            loc: vec!["body".to_string()],
            kind,
            msg: kind.default_message().to_string(),
        }
    }

    /// Error about a named top-level body field.
    pub fn body_field(field: &str, kind: ValidationKind) -> Self {
        Self {
            loc: vec!["body".to_string(), field.to_string()],
            kind,
            msg: kind.default_message().to_string(),
        }
    }

    /// Replace the human-readable message.
    pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = msg.into();
        self
    }
}

/// All field errors found in one request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} invalid field(s)", .0.len())]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Number of field errors.
    pub fn count(&self) -> usize {
        self.0.len()
    }

    /// Field errors, in field order.
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Response body: `{"detail": [...]}`.
    pub fn into_body(self) -> ValidationErrorBody {
        ValidationErrorBody { detail: self.0 }
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

/// 422 response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorBody {
    /// One entry per violating field.
    pub detail: Vec<FieldError>,
}

/// Length and presence rules for a string field.
#[derive(Debug, Clone, Copy)]
struct StringRule {
    field: &'static str,
    required: bool,
    min_length: usize,
    max_length: usize,
}

const NAME_RULE: StringRule = StringRule {
    field: "name",
    required: true,
    min_length: NAME_MIN_LENGTH,
    max_length: NAME_MAX_LENGTH,
};

const DESCRIPTION_RULE: StringRule = StringRule {
    field: "description",
    required: false,
    min_length: 0,
    max_length: DESCRIPTION_MAX_LENGTH,
};

fn characters(n: usize) -> &'static str {
    if n == 1 {
        "character"
    } else {
        "characters"
    }
}

impl StringRule {
    /// Apply the rule; `Ok(None)` means an optional field is absent or null.
    fn check(&self, object: &Map<String, Value>) -> Result<Option<String>, FieldError> {
        let value = match object.get(self.field) {
            None | Some(Value::Null) if !self.required => return Ok(None),
            None => return Err(FieldError::body_field(self.field, ValidationKind::Missing)),
            Some(value) => value,
        };

        let Value::String(s) = value else {
            return Err(FieldError::body_field(self.field, ValidationKind::StringType));
        };

        // Limits are in characters, not bytes.
        let length = s.chars().count();
        if length < self.min_length {
            return Err(
                FieldError::body_field(self.field, ValidationKind::StringTooShort).with_msg(
                    format!(
                        "String should have at least {} {}",
                        self.min_length,
                        characters(self.min_length)
                    ),
                ),
            );
        }
        if length > self.max_length {
            return Err(
                FieldError::body_field(self.field, ValidationKind::StringTooLong).with_msg(
                    format!(
                        "String should have at most {} {}",
                        self.max_length,
                        characters(self.max_length)
                    ),
                ),
            );
        }

        Ok(Some(s.clone()))
    }
}

/// Whether a `Content-Type` value names JSON (`application/json` or
/// `application/*+json`), ignoring parameters such as `charset`.
pub fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.split_once('/') {
        Some(("application", subtype)) => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}

/// Parse raw request bytes as a JSON document.
///
/// Without a `Content-Type` the body is still read as JSON. A non-JSON type
/// means the body is not an object, so the request is rejected.
pub fn parse_body(content_type: Option<&str>, bytes: &[u8]) -> Result<Value, ValidationErrors> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(FieldError::body(ValidationKind::Missing).into());
    }
    if content_type.is_some_and(|ct| !is_json_content_type(ct)) {
        return Err(FieldError::body(ValidationKind::ModelAttributesType).into());
    }
    serde_json::from_slice(bytes).map_err(|e| {
        FieldError::body(ValidationKind::JsonInvalid)
            .with_msg(format!("JSON decode error: {e}"))
            .into()
    })
}

/// Check an item-creation payload, collecting every violation.
///
/// Unknown fields are ignored.
pub fn validate_new_item(body: &Value) -> Result<NewItem, ValidationErrors> {
    let Value::Object(object) = body else {
        return Err(FieldError::body(ValidationKind::ModelAttributesType).into());
    };

    match (NAME_RULE.check(object), DESCRIPTION_RULE.check(object)) {
        (Ok(Some(name)), Ok(description)) => Ok(NewItem { name, description }),
        (name, description) => Err(name
            .err()
            .into_iter()
            .chain(description.err())
            .collect::<Vec<_>>()
            .into()),
    }
}

/// Extractor yielding a validated [`NewItem`] from a JSON request body.
#[derive(Debug, Clone)]
pub struct ValidatedItem(pub NewItem);

#[async_trait]
impl<S> FromRequest<S> for ValidatedItem
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .map(|value| value.to_str().unwrap_or_default().to_owned());
        let bytes = Bytes::from_request(req, state).await?;
        let body = parse_body(content_type.as_deref(), &bytes)?;
        Ok(Self(validate_new_item(&body)?))
    }
}
