//! Partial element updates.

use super::{Element, ElementKind, FontStyle, FontWeight, Rgba, TextAlign, TextDecoration};
use serde::{Deserialize, Serialize};

/// A set of optional field changes merged into an element.
///
/// Fields that do not apply to the target's kind (for example `font_size` on
/// a rectangle) are ignored. Geometry is re-normalized after every merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,

    pub opacity: Option<f64>,
    pub fill_color: Option<Rgba>,
    pub stroke_color: Option<Rgba>,
    pub stroke_width: Option<f64>,

    pub content: Option<String>,
    pub font_size: Option<f64>,
    pub color: Option<Rgba>,
    pub font_family: Option<String>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub text_decoration: Option<TextDecoration>,
    pub line_height: Option<f64>,
    pub letter_spacing: Option<f64>,
    pub text_align: Option<TextAlign>,

    pub src: Option<String>,
}

impl ElementPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn geometry(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation: Some(degrees),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into `element` and re-normalize with the given size floor.
    pub fn apply_to(&self, element: &mut Element, min_size: f64) {
        if let Some(v) = self.x {
            element.x = v;
        }
        if let Some(v) = self.y {
            element.y = v;
        }
        if let Some(v) = self.width {
            element.width = v;
        }
        if let Some(v) = self.height {
            element.height = v;
        }
        if let Some(v) = self.rotation {
            element.rotation = v;
        }
        if let Some(v) = self.visible {
            element.visible = v;
        }
        if let Some(v) = self.locked {
            element.locked = v;
        }

        match &mut element.kind {
            ElementKind::Text(t) => {
                if let Some(v) = &self.content {
                    t.content.clone_from(v);
                }
                if let Some(v) = self.font_size {
                    t.font_size = v;
                }
                if let Some(v) = self.color {
                    t.color = v;
                }
                if let Some(v) = &self.font_family {
                    t.font_family.clone_from(v);
                }
                if let Some(v) = self.font_weight {
                    t.font_weight = v;
                }
                if let Some(v) = self.font_style {
                    t.font_style = v;
                }
                if let Some(v) = self.text_decoration {
                    t.text_decoration = v;
                }
                if let Some(v) = self.line_height {
                    t.line_height = v;
                }
                if let Some(v) = self.letter_spacing {
                    t.letter_spacing = v;
                }
                if let Some(v) = self.text_align {
                    t.text_align = v;
                }
            }
            ElementKind::Image(i) => {
                if let Some(v) = &self.src {
                    i.src.clone_from(v);
                }
            }
            ElementKind::Rectangle(s)
            | ElementKind::Circle(s)
            | ElementKind::Line(s)
            | ElementKind::Triangle(s) => {
                if let Some(v) = self.opacity {
                    s.opacity = v;
                }
                if let Some(v) = self.fill_color {
                    s.fill_color = v;
                }
                if let Some(v) = self.stroke_color {
                    s.stroke_color = v;
                }
                if let Some(v) = self.stroke_width {
                    s.stroke_width = v;
                }
            }
        }

        element.normalize_with(min_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::MIN_ELEMENT_SIZE;

    #[test]
    fn test_apply_geometry_and_clamp() {
        let mut el = Element::rectangle();
        ElementPatch::geometry(5.0, 6.0, 2.0, 400.0).apply_to(&mut el, MIN_ELEMENT_SIZE);
        assert_eq!((el.x, el.y, el.width, el.height), (5.0, 6.0, 10.0, 400.0));
    }

    #[test]
    fn test_irrelevant_fields_are_ignored() {
        let mut el = Element::rectangle();
        let before = el.clone();
        let patch = ElementPatch {
            font_size: Some(40.0),
            content: Some("nope".into()),
            ..ElementPatch::default()
        };
        patch.apply_to(&mut el, MIN_ELEMENT_SIZE);
        assert_eq!(el, before);
    }

    #[test]
    fn test_text_fields() {
        let mut el = Element::text(Default::default());
        let patch = ElementPatch {
            content: Some("Hello".into()),
            font_weight: Some(FontWeight::Bold),
            ..ElementPatch::default()
        };
        patch.apply_to(&mut el, MIN_ELEMENT_SIZE);
        let t = el.kind.as_text().unwrap();
        assert_eq!(t.content, "Hello");
        assert_eq!(t.font_weight, FontWeight::Bold);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let patch: ElementPatch =
            serde_json::from_str(r##"{"fillColor":"#ff0000","rotation":450}"##).unwrap();
        let mut el = Element::circle();
        patch.apply_to(&mut el, MIN_ELEMENT_SIZE);
        assert_eq!(el.rotation, 90.0);
        assert_eq!(el.kind.shape_style().unwrap().fill_color, Rgba::rgb(255, 0, 0));
        assert!(ElementPatch::default().is_empty());
    }
}
