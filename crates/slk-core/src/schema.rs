//! JSON schema and example `config.toml`, both derived from [`AppConfig`].

use std::fmt::Write as _;

use anyhow::{Context, Result};
use schemars::Schema;
use schemars::generate::SchemaSettings;
use serde_json::json;

use crate::config::AppConfig;

/// Published location of the config schema under `repo_url`.
fn schema_url(repo_url: &str) -> String {
    format!("{repo_url}/schemas/config.schema.json")
}

/// JSON schema for [`AppConfig`], as printed by `slk config schema`.
///
/// Emitted as draft-07 for TOML language servers such as taplo. The top level
/// accepts a `$schema` key so a config file can reference the schema.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn generate_schema(project_name: &str, repo_url: &str) -> Result<String> {
    let mut schema: Schema = SchemaSettings::draft07()
        .into_generator()
        .into_root_schema_for::<AppConfig>();

    for (key, value) in [
        ("$id", json!(schema_url(repo_url))),
        ("title", json!(format!("{project_name} configuration"))),
        (
            "description",
            json!(format!(
                "Settings for {project_name}: Slack connection, search defaults, output and logging"
            )),
        ),
    ] {
        schema.insert(key.to_string(), value);
    }

    if let Some(props) = schema
        .get_mut("properties")
        .and_then(serde_json::Value::as_object_mut)
    {
        props.insert(
            "$schema".to_string(),
            json!({
                "type": "string",
                "description": "URL of this schema, for editor validation"
            }),
        );
    }

    serde_json::to_string_pretty(&schema).context("serializing JSON schema")
}

/// Example `config.toml` built from the defaults, as printed by
/// `slk config example`.
///
/// # Errors
///
/// Returns an error if TOML serialization fails.
pub fn generate_example_config(project_name: &str, repo_url: &str) -> Result<String> {
    let toml_body = toml::to_string_pretty(&AppConfig::default())
        .context("serializing default config to TOML")?;

    let mut output = String::new();
    let _ = writeln!(output, "\"$schema\" = \"{}\"", schema_url(repo_url));
    let _ = writeln!(output);
    let _ = writeln!(output, "# Example configuration for {project_name}.");
    let _ = writeln!(
        output,
        "# Save as $XDG_CONFIG_HOME/{project_name}/config.toml. Every key is optional."
    );
    let _ = writeln!(
        output,
        "# The API token is best kept in SLACK_API_TOKEN rather than in [slack] token."
    );
    let _ = writeln!(output);
    output.push_str(&toml_body);

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::APP_NAME;

    const REPO_URL: &str = "https://github.com/byteowlz/slk";

    #[test]
    fn test_schema_generation() {
        let schema = generate_schema(APP_NAME, REPO_URL).expect("schema generation failed");
        assert!(schema.contains("\"title\""));
        assert!(schema.contains("slk configuration"));
        assert!(schema.contains("\"$schema\""));
        assert!(schema.contains("LogLevel"));
        assert!(schema.contains("SortBy"));
        assert!(schema.contains("OutputFormat"));
    }

    #[test]
    fn test_config_generation() {
        let config = generate_example_config(APP_NAME, REPO_URL).expect("config generation failed");
        assert!(config.contains("[logging]"));
        assert!(config.contains("[slack]"));
        assert!(config.contains("[search]"));
        assert!(config.contains("[output]"));
        assert!(config.contains("$schema"));
    }

    #[test]
    fn example_config_parses_back() {
        let config = generate_example_config(APP_NAME, REPO_URL).expect("config generation failed");
        let parsed: AppConfig = toml::from_str(&config).expect("example config is valid TOML");
        assert_eq!(parsed.search.count, 20);
        assert!(parsed.schema.is_some());
    }
}
