use wasm_bindgen::prelude::*;

use crate::data::ErrorData;
use crate::exception::StructuredError;
use crate::wire::WireError;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = JSON)]
    fn parse(s: &str) -> JsValue;
}

fn to_js(value: &serde_json::Value) -> JsValue {
    match serde_json::to_string(value) {
        Ok(json_str) => parse(&json_str),
        Err(_) => JsValue::NULL,
    }
}

fn error_result(msg: &str) -> JsValue {
    let obj = serde_json::json!({"error": msg});
    to_js(&obj)
}

/// Build a structured error from a plain JS object and return its wire record.
///
/// Object keys are keyword strings such as `":arachne.error/type"`.
#[wasm_bindgen]
pub fn build_error(data: JsValue) -> JsValue {
    let fields: serde_json::Map<String, serde_json::Value> =
        match serde_wasm_bindgen::from_value(data) {
            Ok(fields) => fields,
            Err(_) => return error_result("Expected a plain object of error data"),
        };

    match StructuredError::new(ErrorData::from_json(fields)) {
        Ok(err) => match serde_json::to_value(WireError::from(&err)) {
            Ok(wire) => to_js(&wire),
            Err(e) => error_result(&e.to_string()),
        },
        Err(e) => error_result(&e.to_string()),
    }
}

/// Decode a wire JSON string and describe the rebuilt error chain.
#[wasm_bindgen]
pub fn describe_error(json: &str) -> JsValue {
    let err = match WireError::from_json(json).and_then(WireError::into_error) {
        Ok(err) => err,
        Err(e) => return error_result(&e.to_string()),
    };

    let causes: Vec<serde_json::Value> = err
        .chain()
        .skip(1)
        .map(|cause| serde_json::Value::String(cause.to_string()))
        .collect();

    let result = serde_json::json!({
        "display": err.to_string(),
        "type": err.error_type(),
        "message": err.message(),
        "causes": causes,
    });
    to_js(&result)
}
