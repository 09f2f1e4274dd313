use serde_json::{Map, Value};
use snafu::{OptionExt, Snafu};

use crate::model::{NewVideo, VideoPatch};

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ValidationError {
    #[snafu(display("request body must be a JSON object"))]
    MalformedBody,

    #[snafu(display("field `{field}` is required"))]
    MissingField { field: &'static str },

    #[snafu(display("field `{field}` must be {expected}"))]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

/// A JSON value that a payload field can hold.
trait Field: Sized {
    const EXPECTED: &'static str;

    fn from_value(value: Value) -> Option<Self>;
}

impl Field for String {
    const EXPECTED: &'static str = "a string";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(text),
            _ => None,
        }
    }
}

impl Field for i64 {
    const EXPECTED: &'static str = "an integer";

    fn from_value(value: Value) -> Option<Self> {
        value.as_i64()
    }
}

/// Validate a payload for creating a video: `name`, `views` and `likes` must all be present.
pub fn creation(body: &[u8]) -> Result<NewVideo, ValidationError> {
    let mut object = parse(body)?;

    let name = required(&mut object, "name")?;
    let views = required(&mut object, "views")?;
    let likes = required(&mut object, "likes")?;

    Ok(NewVideo::new(name, views, likes))
}

/// Validate a payload for updating a video. Absent and `null` fields are left out of the patch.
pub fn update(body: &[u8]) -> Result<VideoPatch, ValidationError> {
    let mut object = parse(body)?;

    let name = optional(&mut object, "name")?;
    let views = optional(&mut object, "views")?;
    let likes = optional(&mut object, "likes")?;

    Ok(VideoPatch::new(name, views, likes))
}

fn parse(body: &[u8]) -> Result<Map<String, Value>, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Ok(object),
        _ => MalformedBodySnafu.fail(),
    }
}

fn optional<T: Field>(
    object: &mut Map<String, Value>, field: &'static str,
) -> Result<Option<T>, ValidationError> {
    match object.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::from_value(value)
            .context(InvalidFieldSnafu {
                field,
                expected: T::EXPECTED,
            })
            .map(Some),
    }
}

fn required<T: Field>(
    object: &mut Map<String, Value>, field: &'static str,
) -> Result<T, ValidationError> {
    optional(object, field)?.context(MissingFieldSnafu { field })
}
