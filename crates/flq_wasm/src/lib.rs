use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn flatten(json_str: &str) -> Result<String, String> {
    let flat = flq_core::flatten_json(json_str, "").map_err(|e| e.to_string())?;

    serde_json::to_string_pretty(&serde_json::Value::Object(flat))
        .map_err(|e| format!("Serialization error: {}", e))
}

#[wasm_bindgen]
pub fn deflatten(json_str: &str) -> Result<String, String> {
    let value = flq_core::deflatten_json(json_str).map_err(|e| e.to_string())?;

    serde_json::to_string_pretty(&value).map_err(|e| format!("Serialization error: {}", e))
}

#[wasm_bindgen]
pub fn filter(query_str: &str, json_str: &str) -> Result<String, String> {
    let kept = flq_core::filter_json(query_str, json_str).map_err(|e| e.to_string())?;

    serde_json::to_string_pretty(&kept).map_err(|e| format!("Serialization error: {}", e))
}
