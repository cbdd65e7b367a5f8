// File: src/config.rs
// Purpose: Configuration parsing from itemform.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::codes::{CodeFormat, MessageCodesResolver};
use crate::dispatcher::ValidationDispatcher;
use crate::item::{item_constraints, ItemBounds};
use crate::messages::Messages;
use crate::validator::ItemValidator;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub codes: CodesConfig,

    #[serde(default)]
    pub item: ItemBounds,

    /// Message templates layered over the built-in ones
    #[serde(default)]
    pub messages: HashMap<String, String>,
}

/// Message code generation
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CodesConfig {
    /// Prepended to every generated code
    #[serde(default)]
    pub prefix: String,

    #[serde(default)]
    pub format: CodeFormat,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./itemform.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("itemform.toml")
    }

    pub fn resolver(&self) -> MessageCodesResolver {
        MessageCodesResolver::new()
            .with_prefix(self.codes.prefix.clone())
            .with_format(self.codes.format)
    }

    /// Built-in templates with this config's overrides applied
    pub fn messages(&self) -> Messages {
        let mut messages = Messages::builtin();
        messages.extend(self.messages.clone());
        messages
    }

    /// Item dispatcher honoring the configured bounds and code format.
    /// `with_item_validator` also registers the hand-written validator.
    pub fn dispatcher(&self, with_item_validator: bool) -> Result<ValidationDispatcher> {
        let constraints =
            item_constraints(self.item).context("Invalid item bounds in configuration")?;
        let dispatcher = ValidationDispatcher::new()
            .with_resolver(self.resolver())
            .with_constraints(constraints);

        Ok(if with_item_validator {
            dispatcher.with_validator(ItemValidator::new(self.item))
        } else {
            dispatcher
        })
    }
}
