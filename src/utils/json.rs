use mongodb::bson::{Bson, Document};
use serde_json::{Map, Value};

/// Converts a stored document into plain JSON: object ids become hex strings,
/// dates become RFC 3339, everything else follows relaxed extended JSON.
pub fn document_to_json(document: Document) -> Value {
    bson_to_json(Bson::Document(document))
}

pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(date) => match date.try_to_rfc3339_string() {
            Ok(formatted) => Value::String(formatted),
            Err(_) => Bson::DateTime(date).into_relaxed_extjson(),
        },
        Bson::Document(document) => Value::Object(
            document
                .into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect::<Map<String, Value>>(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}
