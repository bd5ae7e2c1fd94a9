//! Typography attributes for text elements.

use super::Rgba;
use serde::{Deserialize, Serialize};

/// Default font size in canvas units.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Default font family.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Placeholder content for newly created text elements.
pub const DEFAULT_TEXT_CONTENT: &str = "Double-click to edit";

/// Font families offered by the property panel. Free-form names are still accepted.
pub const FONT_FAMILIES: &[&str] = &[
    "Arial",
    "Verdana",
    "Helvetica",
    "Times New Roman",
    "Courier New",
    "Georgia",
    "Palatino",
    "Garamond",
    "Comic Sans MS",
    "Trebuchet MS",
    "Arial Black",
    "Impact",
];

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// Numeric CSS weight.
    pub fn value(self) -> u16 {
        match self {
            FontWeight::Normal => 400,
            FontWeight::Bold => 700,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

/// Font slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub fn name(self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }
}

/// Text decoration line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

impl TextDecoration {
    pub fn name(self) -> &'static str {
        match self {
            TextDecoration::None => "none",
            TextDecoration::Underline => "underline",
            TextDecoration::LineThrough => "line-through",
        }
    }
}

/// Horizontal alignment of text lines inside the element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Horizontal anchor of a line of `line_width` inside a box of `box_width`.
    pub fn line_offset(self, box_width: f64, line_width: f64) -> f64 {
        match self {
            TextAlign::Left => 0.0,
            TextAlign::Center => (box_width - line_width) / 2.0,
            TextAlign::Right => box_width - line_width,
        }
    }
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_line_height() -> f64 {
    1.0
}

/// Content and typography of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub color: Rgba,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub font_style: FontStyle,
    #[serde(default)]
    pub text_decoration: TextDecoration,
    /// Line height as a multiple of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    /// Extra spacing between glyphs in canvas units.
    #[serde(default)]
    pub letter_spacing: f64,
    #[serde(default)]
    pub text_align: TextAlign,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            content: DEFAULT_TEXT_CONTENT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            color: Rgba::BLACK,
            font_family: default_font_family(),
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            text_decoration: TextDecoration::None,
            line_height: default_line_height(),
            letter_spacing: 0.0,
            text_align: TextAlign::Left,
        }
    }
}

impl TextProps {
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Distance between consecutive baselines.
    pub fn line_advance(&self) -> f64 {
        self.font_size * self.line_height
    }

    /// Clamp sizes to usable values.
    pub(crate) fn normalize(&mut self) {
        if !self.font_size.is_finite() || self.font_size < 1.0 {
            self.font_size = 1.0;
        }
        if !self.line_height.is_finite() || self.line_height <= 0.0 {
            self.line_height = default_line_height();
        }
        if !self.letter_spacing.is_finite() {
            self.letter_spacing = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let props: TextProps = serde_json::from_str(r#"{"content":"hi"}"#).unwrap();
        assert_eq!(props.content, "hi");
        assert_eq!(props.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(props.font_family, "Arial");
        assert_eq!(props.line_height, 1.0);
        assert_eq!(props.text_align, TextAlign::Left);
    }

    #[test]
    fn test_enum_wire_names() {
        let props = TextProps {
            text_decoration: TextDecoration::LineThrough,
            font_weight: FontWeight::Bold,
            ..TextProps::default()
        };
        let json = serde_json::to_value(&props).unwrap();
        assert_eq!(json["textDecoration"], "line-through");
        assert_eq!(json["fontWeight"], "bold");
        assert_eq!(json["fontSize"], 16.0);
    }

    #[test]
    fn test_align_offsets() {
        assert_eq!(TextAlign::Left.line_offset(100.0, 40.0), 0.0);
        assert_eq!(TextAlign::Center.line_offset(100.0, 40.0), 30.0);
        assert_eq!(TextAlign::Right.line_offset(100.0, 40.0), 60.0);
    }
}
