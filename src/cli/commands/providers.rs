//! Providers Command
//!
//! Credential status for every configured text provider, plus the fallback
//! order of each endpoint. Keys themselves are never printed.

use serde::Serialize;

use crate::ai::ProviderConfig;
use crate::cli::Output;
use crate::config::{Config, ConfigLoader, ProviderKind};
use crate::types::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderRow {
    pub name: String,
    pub kind: ProviderKind,
    pub model: String,
    pub api_key_env: Option<String>,
    pub configured: bool,
}

/// Resolve credentials through `lookup` without building any HTTP client
pub fn collect<F>(config: &Config, lookup: F) -> Vec<ProviderRow>
where
    F: Fn(&str) -> Option<String>,
{
    config
        .llm
        .providers
        .iter()
        .map(|settings| {
            let resolved = ProviderConfig::from_settings(settings, &config.llm, &lookup);
            ProviderRow {
                name: settings.name.clone(),
                kind: settings.kind,
                model: settings.model.clone(),
                api_key_env: settings.api_key_env.clone(),
                configured: resolved.has_credential(),
            }
        })
        .collect()
}

pub fn run(format: &str) -> Result<()> {
    let config = ConfigLoader::load()?;
    let rows = collect(&config, |var| std::env::var(var).ok());

    if format == "json" {
        let value = serde_json::json!({
            "providers": rows,
            "leap_of_faith_order": config.llm.leap_of_faith_order,
            "mom_test_order": config.llm.mom_test_order,
            "image_api_base": config.image.api_base,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let output = Output::new();
    output.section("Text providers");
    let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    for row in &rows {
        let credential = match (&row.api_key_env, row.configured) {
            (Some(var), true) => format!("{} set", var),
            (Some(var), false) => format!("{} not set", var),
            (None, _) => "no credential variable".to_string(),
        };
        output.check(
            row.configured,
            &row.name,
            width,
            &format!("{} · {} · {}", row.kind, row.model, credential),
        );
    }

    output.section("Fallback order");
    output.info(&format!(
        "leap-of-faith: {}",
        config.llm.leap_of_faith_order.join(" → ")
    ));
    output.info(&format!("mom-test:      {}", config.llm.mom_test_order.join(" → ")));
    output.info(&format!("image:         pollinations ({})", config.image.api_base));

    let configured = rows.iter().filter(|r| r.configured).count();
    if configured == 0 {
        output.warning("No provider has a credential; every request will use the offline backup.");
    } else {
        output.success(&format!("{} of {} providers configured", configured, rows.len()));
    }
    Ok(())
}
