use std::{env, fs, path::PathBuf};

use menu_api::openapi::ApiDocV1;
use utoipa::OpenApi;

/// Writes the OpenAPI document to `openapi/menu-api.json`, or to the path
/// given as the first argument.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let openapi = ApiDocV1::openapi();
    let json = serde_json::to_string_pretty(&openapi)?;

    let output_path = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("openapi").join("menu-api.json"));
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(&output_path, json)?;

    println!("OpenAPI spec written to {}", output_path.display());
    Ok(())
}
