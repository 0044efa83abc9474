use crate::cli::{parse_pixels, Args};
use crate::queue::QueueItem;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Represents a saved label description
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelFile {
    pub name: Option<String>,
    pub font: Option<String>,
    pub font_size: Option<u32>,
    #[serde(default)]
    pub items: Vec<LabelItemJson>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LabelItemJson {
    Text { lines: Vec<String> },
    Image { path: String },
    Pad { pixels: PixelValue },
    Cutmark,
}

/// Padding may be written as a number or as a numeric string
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PixelValue {
    Number(u32),
    Text(String),
}

impl LabelFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read label file: {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse label file: {:?}", path))
    }

    /// Convert the stored items into queue items, validating each one
    pub fn queue_items(&self) -> Result<Vec<QueueItem>> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.to_queue_item()
                    .with_context(|| format!("Invalid item #{} in label file", index + 1))
            })
            .collect()
    }
}

impl LabelItemJson {
    fn to_queue_item(&self) -> Result<QueueItem> {
        match self {
            LabelItemJson::Text { lines } => QueueItem::text(lines.iter().cloned())
                .ok_or_else(|| anyhow::anyhow!("text item has no non-empty lines")),
            LabelItemJson::Image { path } => {
                if path.is_empty() {
                    return Err(anyhow::anyhow!("image item has an empty path"));
                }
                Ok(QueueItem::image(path.clone()))
            }
            LabelItemJson::Pad { pixels } => match pixels {
                PixelValue::Number(pixels) => Ok(QueueItem::pad(*pixels)),
                PixelValue::Text(text) => parse_pixels(text)
                    .map(QueueItem::pad)
                    .ok_or_else(|| anyhow::anyhow!("invalid padding '{}'", text)),
            },
            LabelItemJson::Cutmark => Ok(QueueItem::Cutmark),
        }
    }
}

impl Args {
    /// Load the label file, if any, and merge it with command-line arguments.
    /// Command-line font settings take precedence; label file items come
    /// before command-line items.
    pub fn load_and_merge_config(&mut self) -> Result<()> {
        if let Some(config_path) = self.config_file.clone() {
            let label = LabelFile::load(&config_path)?;
            self.merge_from_label(label)?;

            if self.verbose && !self.json {
                eprintln!("Loaded label file from: {:?}", config_path);
            }
        }
        Ok(())
    }

    fn merge_from_label(&mut self, label: LabelFile) -> Result<()> {
        let mut items = label.queue_items()?;

        if self.font.is_none() {
            self.font = label.font.filter(|font| !font.is_empty());
        }
        if self.font_size.is_none() {
            self.font_size = label.font_size;
        }

        items.append(&mut self.items);
        self.items = items;

        Ok(())
    }
}
