//! Page-embedded configuration.
//!
//! The host page declares its collections and signature pad once, in a JSON
//! block the client deserializes at startup. Field schemas are resolved here
//! rather than sniffed from markup on every row creation.

use serde::Deserialize;

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Number,
    Textarea,
    Checkbox,
    Hidden,
}

impl InputKind {
    /// Whether materializing a fresh row should blank this field. Hidden
    /// fields (identifier, delete flag) stay as authored in the template.
    pub fn resets_on_materialize(self) -> bool {
        !matches!(self, InputKind::Hidden)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct FieldSpec {
    pub name: String,
    pub kind: InputKind,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CollectionConfig {
    /// Management-form prefix, e.g. `equipment`.
    pub prefix: String,
    /// Element id of the row container (a tbody, usually).
    pub container: String,
    /// Element id of the add button.
    pub add_button: String,
    /// Element id of the `<template>` holding one unbound row.
    pub template: String,
    pub fields: Vec<FieldSpec>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct StrokeStyle {
    #[serde(default = "default_stroke_color")]
    pub color: String,
    #[serde(default = "default_stroke_width")]
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: default_stroke_color(),
            width: default_stroke_width(),
        }
    }
}

fn default_stroke_color() -> String {
    "#1f1f1f".to_string()
}

fn default_stroke_width() -> f64 {
    2.0
}

#[derive(Deserialize, Clone, Debug)]
pub struct PadConfig {
    /// Element id of the signature canvas.
    pub canvas: String,
    /// Element id of the hidden field receiving the PNG data URI.
    pub output: String,
    pub clear_button: String,
    #[serde(default)]
    pub undo_button: Option<String>,
    #[serde(default)]
    pub stroke: StrokeStyle,
}

#[derive(Deserialize, Debug, Default)]
pub struct FormConfig {
    #[serde(default)]
    pub collections: Vec<CollectionConfig>,
    #[serde(default)]
    pub signature: Option<PadConfig>,
}
