use std::path::Path;

use serde_json::{json, Value};

use crate::model::config::{HeaderTemplate, ProjectConfig};
use crate::model::language::{self, Language};
use crate::services::{pipeline, storage::CatalogLayout};

mod command;
use command::Command;

const DEFAULT_CATALOG_DIR: &str = "translation";

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn get_str<'a>(payload: &'a Value, field: &str) -> Option<&'a str> {
    payload
        .get(field)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

fn languages_from_payload(payload: &Value) -> Vec<Language> {
    let codes: Vec<&str> = payload
        .get("languages")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();
    language::resolve_targets(&codes)
}

fn layout_from_payload(payload: &Value, field: &str, config: &ProjectConfig) -> CatalogLayout {
    let root = get_str(payload, field).unwrap_or(DEFAULT_CATALOG_DIR);
    CatalogLayout::new(root, config.catalog_extension.as_str())
}

fn document_path(payload: &Value) -> Result<&Path, String> {
    get_str(payload, "document")
        .map(Path::new)
        .ok_or_else(|| "payload.document is required".to_string())
}

/// Handles one JSON request line and returns one JSON response line.
pub fn handle(input: &str, config: &ProjectConfig) -> String {
    let req: Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(_) => {
            return json!({
                "status": "error",
                "message": "invalid json"
            })
            .to_string();
        }
    };

    let id = get_id(&req);
    let payload = get_payload(&req);

    match Command::from(get_cmd(&req)) {
        Command::Ping => ok(id, json!({ "message": "rcg-l10n alive" })),

        Command::Extract => {
            let source = match document_path(payload) {
                Ok(p) => p,
                Err(e) => return err(id, e),
            };
            let layout = layout_from_payload(payload, "output_dir", config);
            let languages = languages_from_payload(payload);
            let templates = payload
                .get("templates")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);

            let header = HeaderTemplate::now(config);
            match pipeline::extract_document(source, &layout, &header, &languages, templates) {
                Ok(report) => ok(id, json!({ "report": report })),
                Err(e) => err(id, e.to_string()),
            }
        }

        Command::Pack => {
            let source = match document_path(payload) {
                Ok(p) => p,
                Err(e) => return err(id, e),
            };
            let layout = layout_from_payload(payload, "catalog_dir", config);
            let languages = languages_from_payload(payload);
            let output = get_str(payload, "output").map(Path::new);

            match pipeline::pack_document(source, output, &layout, &languages) {
                Ok(report) => ok(id, json!({ "report": report })),
                Err(e) => err(id, e.to_string()),
            }
        }

        Command::Stats => {
            let source = match document_path(payload) {
                Ok(p) => p,
                Err(e) => return err(id, e),
            };
            let layout = layout_from_payload(payload, "catalog_dir", config);
            let languages = languages_from_payload(payload);

            match pipeline::stats_document(source, &layout, &languages) {
                Ok(report) => ok(id, json!({ "report": report })),
                Err(e) => err(id, e.to_string()),
            }
        }

        Command::Unknown => err(id, "unknown command"),
    }
}
