//! Print queue model
//!
//! The queue is the single source of truth for what gets printed. Both the
//! CLI and the GUI render their view of it from scratch, so items are
//! addressed by position only and every index must be revalidated after a
//! mutation.

use serde::Serialize;
use std::ops::Deref;
use std::path::Path;
use thiserror::Error;

/// Lines of a text block; never empty and never holding an empty line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TextLines(Vec<String>);

impl TextLines {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Deref for TextLines {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

/// One unit of print content, in print order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QueueItem {
    /// One or more text lines, rendered as a single block
    Text { lines: TextLines },
    /// PNG image included as-is
    Image { path: String },
    /// Blank padding, in pixels
    Pad { pixels: u32 },
    /// Cut mark between labels
    Cutmark,
}

impl QueueItem {
    /// Build a text item from raw entry lines.
    ///
    /// Empty lines are dropped. Returns `None` when nothing is left, so a
    /// `Text` item always carries at least one non-empty line.
    pub fn text<I, S>(lines: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines
            .into_iter()
            .map(Into::into)
            .filter(|line| !line.is_empty())
            .collect();

        if lines.is_empty() {
            None
        } else {
            Some(QueueItem::Text {
                lines: TextLines(lines),
            })
        }
    }

    pub fn image(path: impl Into<String>) -> Self {
        QueueItem::Image { path: path.into() }
    }

    pub fn pad(pixels: u32) -> Self {
        QueueItem::Pad { pixels }
    }

    /// Short kind name, as used in item specs and JSON
    pub fn kind(&self) -> &'static str {
        match self {
            QueueItem::Text { .. } => "text",
            QueueItem::Image { .. } => "image",
            QueueItem::Pad { .. } => "pad",
            QueueItem::Cutmark => "cutmark",
        }
    }

    /// One-line description for queue listings
    pub fn describe(&self) -> String {
        match self {
            QueueItem::Text { lines } => format!("Text: {}", lines.join(" | ")),
            QueueItem::Image { path } => {
                let name = Path::new(path)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.clone());
                format!("Image: {}", name)
            }
            QueueItem::Pad { pixels } => format!("Padding: {}px", pixels),
            QueueItem::Cutmark => "Cutmark".to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("queue index {index} is out of range (queue has {len} items)")]
    OutOfRange { index: usize, len: usize },
}

/// Ordered list of queue items; insertion order is print order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Queue {
    items: Vec<QueueItem>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, item: QueueItem) {
        self.items.push(item);
    }

    /// Swap the item at `index` with the one before it.
    ///
    /// Returns `false` without touching the queue when `index` is 0 or out of range.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.items.len() {
            return false;
        }
        self.items.swap(index, index - 1);
        true
    }

    /// Swap the item at `index` with the one after it.
    ///
    /// Returns `false` without touching the queue when `index` is the last
    /// position or out of range.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index >= self.items.len().saturating_sub(1) {
            return false;
        }
        self.items.swap(index, index + 1);
        true
    }

    /// Remove the item at `index`, shifting later items left
    pub fn remove(&mut self, index: usize) -> Result<QueueItem, QueueError> {
        if index >= self.items.len() {
            return Err(QueueError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QueueItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueueItem> {
        self.items.iter()
    }

    pub fn items(&self) -> &[QueueItem] {
        &self.items
    }
}

impl FromIterator<QueueItem> for Queue {
    fn from_iter<T: IntoIterator<Item = QueueItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl Extend<QueueItem> for Queue {
    fn extend<T: IntoIterator<Item = QueueItem>>(&mut self, iter: T) {
        self.items.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a QueueItem;
    type IntoIter = std::slice::Iter<'a, QueueItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn sample_queue() -> Queue {
        vec![
            QueueItem::text(["Hello"]).unwrap(),
            QueueItem::image("/tmp/logo.png"),
            QueueItem::pad(5),
            QueueItem::Cutmark,
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_text_filters_empty_lines() {
        let item = QueueItem::text(["", "Hello", "", "World"]).unwrap();
        match item {
            QueueItem::Text { lines } => assert_eq!(lines.as_slice(), ["Hello", "World"]),
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn test_text_requires_a_line() {
        assert_eq!(QueueItem::text(["", "", "", ""]), None);
        assert_eq!(QueueItem::text(Vec::<String>::new()), None);
    }

    #[test]
    fn test_describe() {
        let queue = sample_queue();
        let descriptions: Vec<String> = queue.iter().map(QueueItem::describe).collect();
        assert_eq!(
            descriptions,
            vec!["Text: Hello", "Image: logo.png", "Padding: 5px", "Cutmark"]
        );

        let multi = QueueItem::text(["a", "b", "c"]).unwrap();
        assert_eq!(multi.describe(), "Text: a | b | c");
    }

    #[test]
    fn test_move_at_boundaries_is_noop() {
        let mut queue = sample_queue();
        let before = queue.clone();

        assert!(!queue.move_up(0));
        assert!(!queue.move_down(queue.len() - 1));
        assert!(!queue.move_up(42));
        assert!(!queue.move_down(42));
        assert!(!queue.move_up(usize::MAX));
        assert!(!queue.move_down(usize::MAX));
        assert_eq!(queue, before);

        let mut empty = Queue::new();
        assert!(!empty.move_up(0));
        assert!(!empty.move_down(0));
        assert!(!empty.move_down(usize::MAX));

        let mut single: Queue = std::iter::once(QueueItem::Cutmark).collect();
        assert!(!single.move_down(usize::MAX));
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_move_swaps_neighbors() {
        let mut queue = sample_queue();
        assert!(queue.move_up(2));
        assert_eq!(queue.get(1), Some(&QueueItem::pad(5)));
        assert_eq!(queue.get(2), Some(&QueueItem::image("/tmp/logo.png")));

        assert!(queue.move_down(0));
        assert_eq!(queue.get(0), Some(&QueueItem::pad(5)));
        assert_eq!(queue.get(1).map(QueueItem::kind), Some("text"));
    }

    #[test]
    fn test_remove_shifts_left() {
        let mut queue = sample_queue();
        let removed = queue.remove(1).unwrap();
        assert_eq!(removed, QueueItem::image("/tmp/logo.png"));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.get(1), Some(&QueueItem::pad(5)));
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut queue = sample_queue();
        assert_eq!(
            queue.remove(4),
            Err(QueueError::OutOfRange { index: 4, len: 4 })
        );
        assert_eq!(queue.len(), 4);
    }

    #[test]
    fn test_matches_reference_model() {
        let mut rng = rand::rng();

        for _ in 0..200 {
            let mut queue = Queue::new();
            let mut model: Vec<QueueItem> = Vec::new();

            for step in 0..60u32 {
                let len = model.len();
                match rng.random_range(0..4) {
                    0 => {
                        let item = QueueItem::pad(step);
                        queue.append(item.clone());
                        model.push(item);
                    }
                    1 => {
                        let index = rng.random_range(0..len + 2);
                        queue.move_up(index);
                        if index > 0 && index < len {
                            model.swap(index, index - 1);
                        }
                    }
                    2 => {
                        let index = rng.random_range(0..len + 2);
                        queue.move_down(index);
                        if index + 1 < len {
                            model.swap(index, index + 1);
                        }
                    }
                    _ => {
                        let index = rng.random_range(0..len + 2);
                        let result = queue.remove(index);
                        if index < len {
                            assert_eq!(result, Ok(model.remove(index)));
                        } else {
                            assert!(result.is_err());
                        }
                    }
                }
                assert_eq!(queue.items(), model.as_slice());
            }
        }
    }

    #[test]
    fn test_serialized_representation() {
        let json = serde_json::to_string(&QueueItem::pad(10)).unwrap();
        assert_eq!(json, r#"{"type":"pad","pixels":10}"#);

        let json = serde_json::to_string(&QueueItem::Cutmark).unwrap();
        assert_eq!(json, r#"{"type":"cutmark"}"#);

        let json = serde_json::to_string(&QueueItem::text(["", "a", "b"]).unwrap()).unwrap();
        assert_eq!(json, r#"{"type":"text","lines":["a","b"]}"#);
    }
}
