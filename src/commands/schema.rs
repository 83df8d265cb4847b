//! `schema` - describe the provider block and the resource

use crate::provider::{PROVIDER_TYPE_NAME, provider_schema};
use crate::resource::EmailTemplateResource;
use crate::resource::email_template::TYPE_NAME;
use crate::ui;
use anyhow::Result;
use colored::Colorize;
use declarative::Schema;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
struct ProviderSchemas {
    provider: Schema,
    resource_schemas: BTreeMap<&'static str, Schema>,
}

fn schemas() -> ProviderSchemas {
    ProviderSchemas {
        provider: provider_schema(),
        resource_schemas: BTreeMap::from([(TYPE_NAME, EmailTemplateResource::schema_definition())]),
    }
}

pub fn run(json: bool) -> Result<()> {
    let schemas = schemas();
    if json {
        println!("{}", serde_json::to_string_pretty(&schemas)?);
        return Ok(());
    }

    print_schema(PROVIDER_TYPE_NAME, &schemas.provider);
    for (name, schema) in &schemas.resource_schemas {
        print_schema(name, schema);
    }
    Ok(())
}

fn print_schema(name: &str, schema: &Schema) {
    ui::header(name);
    if !schema.description.is_empty() {
        println!("{}", schema.description);
        println!();
    }

    for (attribute, attr) in &schema.attributes {
        let mut flags = Vec::new();
        if attr.required {
            flags.push("required");
        }
        if attr.optional {
            flags.push("optional");
        }
        if attr.computed {
            flags.push("computed");
        }
        if attr.sensitive {
            flags.push("sensitive");
        }
        println!(
            "  {:<20} {}",
            attribute.bold(),
            format!("({})", flags.join(", ")).dimmed()
        );
        if !attr.description.is_empty() {
            ui::dim(&format!("  {}", attr.description));
        }
        for modifier in &attr.plan_modifiers {
            ui::dim(&format!("  plan modifier: {modifier}"));
        }
    }
}
