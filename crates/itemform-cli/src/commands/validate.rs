use anyhow::{bail, Context, Result};
use colored::Colorize;
use itemform::{Config, ConstraintGroup, FormData, FromForm, Item, Violation};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct Options {
    pub group: ConstraintGroup,
    pub input: Option<PathBuf>,
    pub json: bool,
    pub with_validator: bool,
}

/// Returns whether the submission is valid
pub fn execute(config: &Config, options: &Options, fields: &[String]) -> Result<bool> {
    let form = read_form(options.input.as_ref(), fields)?;
    debug!(fields = form.as_map().len(), group = %options.group, "validating submission");

    let dispatcher = config.dispatcher(options.with_validator)?;
    let bound = Item::bind(&form, dispatcher.resolver())?;
    let bound = dispatcher.validate_bound(bound, options.group)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&bound.errors)?);
        return Ok(!bound.has_errors());
    }

    if !bound.has_errors() {
        println!("{} item is valid for {}", "✓".green().bold(), options.group);
        return Ok(true);
    }

    let messages = config.messages();
    println!(
        "{} {} problem(s) for {}",
        "✗".red().bold(),
        bound.errors.error_count(),
        options.group
    );
    for violation in bound.errors.all_errors() {
        let target = match violation {
            Violation::Field(e) => format!("{} = {:?}", e.field, e.rejected_value.to_input_string()),
            Violation::Object(e) => format!("({})", e.object_name),
        };
        let text = messages
            .message_for(violation)
            .unwrap_or_else(|| "(no message)".to_string());
        println!("  {}: {}", target.yellow(), text);
        println!("    {}", violation.codes().join(", ").dimmed());
    }

    Ok(false)
}

fn read_form(input: Option<&PathBuf>, fields: &[String]) -> Result<FormData> {
    if let Some(path) = input {
        if !fields.is_empty() {
            bail!("Pass fields either as arguments or with --input, not both");
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {:?}", path))?;
        let json: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse input file: {:?}", path))?;
        return Ok(FormData::from_json(&json));
    }

    let pairs = fields
        .iter()
        .map(|field| parse_field(field))
        .collect::<Result<Vec<_>>>()?;
    Ok(FormData::from_pairs(pairs))
}

fn parse_field(field: &str) -> Result<(String, String)> {
    match field.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => bail!("Expected name=value, got '{}'", field),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("price=1000").unwrap(),
            ("price".to_string(), "1000".to_string())
        );
        assert_eq!(
            parse_field("itemName=").unwrap(),
            ("itemName".to_string(), String::new())
        );
        assert_eq!(
            parse_field("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_field("price").is_err());
        assert!(parse_field("=1").is_err());
    }

    #[test]
    fn test_read_form_from_arguments() {
        let fields = vec!["itemName= pen ".to_string(), "price=10".to_string()];
        let form = read_form(None, &fields).unwrap();
        assert_eq!(form.get("itemName"), Some("pen"));
        assert_eq!(form.get("price"), Some("10"));
    }
}
