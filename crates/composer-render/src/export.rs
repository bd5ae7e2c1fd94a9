//! Scene export to PNG, JPEG and PDF.
//!
//! The page is rasterized with tiny-skia at the requested scale: background
//! first, then every visible element bottom to top. Shapes are filled and
//! stroked directly, text goes through a small SVG document rendered by
//! resvg, and embedded images are decoded on worker threads before painting.
//! PDF output embeds the raster on a single page sized to the canvas.

use crate::decode::{DecodedImage, cover_crop, decode_image};
use crate::error::{ExportError, ExportResult};
use crate::geometry::{RotationPivot, ShapePaint, element_transform, shape_paint};
use crate::renderer::{RenderResult, RendererError};
use composer_core::background::{Background, CanvasSize, ImageMode};
use composer_core::element::{Element, ElementKind, ImageProps, Rgba, TextAlign, TextDecoration, TextProps};
use composer_core::scene::Scene;
use futures::channel::oneshot;
use image::ImageEncoder;
use kurbo::{Affine, BezPath, PathEl};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tiny_skia::{
    FillRule, FilterQuality, GradientStop, IntSize, LinearGradient, Paint, Pattern, Pixmap, PixmapPaint, SpreadMode,
    Stroke, Transform,
};

/// Fill of a background image that is not an embedded data URL.
const BACKGROUND_PLACEHOLDER: Rgba = Rgba::rgb(0xf0, 0xf0, 0xf0);
/// Fill of an image element whose source could not be decoded.
const IMAGE_PLACEHOLDER: Rgba = Rgba::rgb(0xcc, 0xcc, 0xcc);
const IMAGE_PLACEHOLDER_TEXT: Rgba = Rgba::rgb(0x66, 0x66, 0x66);
const IMAGE_PLACEHOLDER_LABEL: &str = "Image not found";
const IMAGE_PLACEHOLDER_FONT_SIZE: f64 = 12.0;
/// Baseline offset below the line top, as a fraction of the font size.
const ASCENT_RATIO: f64 = 0.8;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    /// Single-page PDF with the page raster embedded.
    Pdf,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Png, ExportFormat::Jpeg, ExportFormat::Pdf]
    }

    /// Format for a file extension, case-insensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ExportFormat::Png),
            "jpg" | "jpeg" => Some(ExportFormat::Jpeg),
            "pdf" => Some(ExportFormat::Pdf),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|e| e.to_str()).and_then(Self::from_extension)
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpeg => "JPEG",
            ExportFormat::Pdf => "PDF",
        }
    }
}

/// Pixel density multiplier for raster output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportScale {
    #[default]
    X1,
    X2,
    X3,
}

impl ExportScale {
    pub fn factor(self) -> f64 {
        match self {
            ExportScale::X1 => 1.0,
            ExportScale::X2 => 2.0,
            ExportScale::X3 => 3.0,
        }
    }
}

impl TryFrom<u32> for ExportScale {
    type Error = ExportError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ExportScale::X1),
            2 => Ok(ExportScale::X2),
            3 => Ok(ExportScale::X3),
            other => Err(ExportError::InvalidScale(other)),
        }
    }
}

/// Configuration for scene export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub format: ExportFormat,
    pub scale: ExportScale,
    /// JPEG quality 1-100.
    pub jpeg_quality: u8,
    /// Pivot used for element rotation.
    pub pivot: RotationPivot,
    /// Resolution the PDF page is laid out at; one canvas unit is one pixel at this DPI.
    pub dpi: f32,
    /// PDF document title.
    pub title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            scale: ExportScale::X1,
            jpeg_quality: 92,
            pivot: RotationPivot::Center,
            dpi: 96.0,
            title: "Composition".to_string(),
        }
    }
}

impl ExportConfig {
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_scale(mut self, scale: ExportScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn with_pivot(mut self, pivot: RotationPivot) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Element content resolved before painting.
enum Prepared<'a> {
    Shape(ShapePaint),
    Text(&'a TextProps),
    Image(Option<DecodedImage>),
    Nothing,
}

/// Renders a [`Scene`] to image and document bytes.
pub struct SceneExporter {
    config: ExportConfig,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl SceneExporter {
    /// Create an exporter using the fonts installed on the system.
    pub fn new(config: ExportConfig) -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        log::debug!("Loaded {} font faces for export", fontdb.len());
        Self::with_fontdb(config, Arc::new(fontdb))
    }

    /// Create an exporter with a prepared font database.
    pub fn with_fontdb(config: ExportConfig, fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self { config, fontdb }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export `scene` in the configured format.
    pub async fn export(&self, scene: &Scene) -> ExportResult<Vec<u8>> {
        // PDF pages are laid out at canvas size
        let scale = match self.config.format {
            ExportFormat::Pdf => 1.0,
            _ => self.config.scale.factor(),
        };
        let pixmap = self.render_pixmap(scene, scale).await?;
        let bytes = match self.config.format {
            ExportFormat::Png => encode_png(&pixmap)?,
            ExportFormat::Jpeg => encode_jpeg(&pixmap, self.config.jpeg_quality)?,
            ExportFormat::Pdf => self.encode_pdf(&pixmap, scene.canvas_size(), scale)?,
        };
        log::info!(
            "Exported {} ({}x{} px, {} bytes)",
            self.config.format.name(),
            pixmap.width(),
            pixmap.height(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Blocking variant of [`SceneExporter::export`].
    pub fn export_blocking(&self, scene: &Scene) -> ExportResult<Vec<u8>> {
        pollster::block_on(self.export(scene))
    }

    /// Rasterize the page at `scale` pixels per canvas unit.
    pub async fn render_pixmap(&self, scene: &Scene, scale: f64) -> ExportResult<Pixmap> {
        let size = scene.canvas_size();
        let width = (size.width as f64 * scale).round() as u32;
        let height = (size.height as f64 * scale).round() as u32;
        let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::InvalidSize(width, height))?;

        self.paint_background(&mut pixmap, scene.background(), scale);

        let visible: Vec<&Element> = scene.elements().iter().filter(|el| el.visible).collect();
        let prepared = futures::future::join_all(visible.iter().map(|el| prepare(el))).await;

        for (element, content) in visible.iter().zip(prepared) {
            let transform = Affine::scale(scale) * element_transform(element, self.config.pivot);
            match content {
                Prepared::Shape(paint) => paint_shape(&mut pixmap, &paint, element.opacity(), transform),
                Prepared::Text(props) => {
                    if let Err(err) = self.paint_text(&mut pixmap, element, props, transform) {
                        log::warn!("Text element {} skipped in export: {}", element.id, err);
                    }
                }
                Prepared::Image(Some(image)) => paint_image(&mut pixmap, &image, element, transform),
                Prepared::Image(None) => {
                    if let Err(err) = self.paint_image_placeholder(&mut pixmap, element, transform) {
                        log::warn!("Placeholder label for {} not drawn: {}", element.id, err);
                    }
                }
                Prepared::Nothing => {}
            }
        }
        Ok(pixmap)
    }

    fn paint_background(&self, pixmap: &mut Pixmap, background: &Background, scale: f64) {
        let (w, h) = (pixmap.width() as f32, pixmap.height() as f32);
        match background {
            Background::Solid { color } => pixmap.fill(skia_color(*color)),
            Background::Gradient { colors, direction } => {
                let page = kurbo::Rect::new(0.0, 0.0, w as f64, h as f64);
                let (start, end) = direction.endpoints(page);
                let shader = LinearGradient::new(
                    tiny_skia::Point::from_xy(start.x as f32, start.y as f32),
                    tiny_skia::Point::from_xy(end.x as f32, end.y as f32),
                    vec![
                        GradientStop::new(0.0, skia_color(colors[0])),
                        GradientStop::new(1.0, skia_color(colors[1])),
                    ],
                    SpreadMode::Pad,
                    Transform::identity(),
                );
                match (shader, tiny_skia::Rect::from_xywh(0.0, 0.0, w, h)) {
                    (Some(shader), Some(rect)) => {
                        let paint = Paint {
                            shader,
                            ..Default::default()
                        };
                        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
                    }
                    _ => pixmap.fill(skia_color(colors[0])),
                }
            }
            Background::Image { url, mode } => {
                pixmap.fill(skia_color(BACKGROUND_PLACEHOLDER));
                let Some(url) = url else { return };
                let props = ImageProps {
                    src: url.clone(),
                    original_file_name: None,
                    file_size: None,
                };
                match decode_image(&props) {
                    Ok(image) => paint_background_image(pixmap, &image, *mode, scale),
                    Err(err) => log::warn!("Background image not drawn: {}", err),
                }
            }
        }
    }

    fn paint_text(
        &self,
        pixmap: &mut Pixmap,
        element: &Element,
        props: &TextProps,
        transform: Affine,
    ) -> ExportResult<()> {
        let svg = text_svg(props, element.width, element.height);
        self.render_svg(pixmap, &svg, transform)
    }

    fn paint_image_placeholder(&self, pixmap: &mut Pixmap, element: &Element, transform: Affine) -> ExportResult<()> {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((element.width, 0.0));
        path.line_to((element.width, element.height));
        path.line_to((0.0, element.height));
        path.close_path();
        let placeholder = ShapePaint {
            path,
            fill: Some(IMAGE_PLACEHOLDER),
            stroke: None,
        };
        paint_shape(pixmap, &placeholder, 1.0, transform);

        let label = TextProps {
            content: IMAGE_PLACEHOLDER_LABEL.to_string(),
            font_size: IMAGE_PLACEHOLDER_FONT_SIZE,
            color: IMAGE_PLACEHOLDER_TEXT,
            font_family: "sans-serif".to_string(),
            text_align: TextAlign::Center,
            ..TextProps::default()
        };
        // Vertically centered single line
        let top = (element.height - IMAGE_PLACEHOLDER_FONT_SIZE) / 2.0;
        let svg = text_svg(&label, element.width, element.height);
        self.render_svg(pixmap, &svg, transform * Affine::translate((0.0, top)))
    }

    fn render_svg(&self, pixmap: &mut Pixmap, svg: &str, transform: Affine) -> ExportResult<()> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &options).map_err(|e| ExportError::Font(e.to_string()))?;
        resvg::render(&tree, skia_transform(transform), &mut pixmap.as_mut());
        Ok(())
    }

    fn encode_pdf(&self, pixmap: &Pixmap, canvas: CanvasSize, scale: f64) -> ExportResult<Vec<u8>> {
        let png = encode_png(pixmap)?;
        let page_width = canvas.width as f32 / self.config.dpi * 25.4;
        let page_height = canvas.height as f32 / self.config.dpi * 25.4;

        let (doc, page, layer) = printpdf::PdfDocument::new(
            self.config.title.clone(),
            printpdf::Mm(page_width),
            printpdf::Mm(page_height),
            "Layer 1",
        );
        let layer = doc.get_page(page).get_layer(layer);

        // Round-trip through PNG so printpdf decodes with its own image crate
        let dynamic = printpdf::image_crate::load_from_memory(&png).map_err(|e| ExportError::Pdf(e.to_string()))?;
        let image = printpdf::Image::from_dynamic_image(&dynamic);
        image.add_to_layer(
            layer,
            printpdf::ImageTransform {
                translate_x: Some(printpdf::Mm(0.0)),
                translate_y: Some(printpdf::Mm(0.0)),
                dpi: Some(self.config.dpi * scale as f32),
                ..Default::default()
            },
        );
        doc.save_to_bytes().map_err(|e| ExportError::Pdf(e.to_string()))
    }
}

async fn prepare(element: &Element) -> Prepared<'_> {
    match &element.kind {
        ElementKind::Text(props) => Prepared::Text(props),
        ElementKind::Image(props) => {
            let decoded = match spawn_decode(props.clone()).await {
                Ok(result) => result,
                Err(_) => Err(RendererError::ImageDecode("decode task stopped".to_string())),
            };
            match decoded {
                Ok(image) => Prepared::Image(Some(image)),
                Err(err) => {
                    log::warn!("Image {} exported as placeholder: {}", element.id, err);
                    Prepared::Image(None)
                }
            }
        }
        _ => shape_paint(element).map_or(Prepared::Nothing, Prepared::Shape),
    }
}

/// Decode `props` on a worker thread. The receiver resolves once decoding finishes.
fn spawn_decode(props: ImageProps) -> oneshot::Receiver<RenderResult<DecodedImage>> {
    let (tx, rx) = oneshot::channel();
    let worker = thread::Builder::new()
        .name("image-decode".to_string())
        .spawn(move || tx.send(decode_image(&props)).ok());
    if let Err(err) = worker {
        log::error!("Failed to spawn image decode thread: {}", err);
    }
    rx
}

fn paint_shape(pixmap: &mut Pixmap, shape: &ShapePaint, opacity: f64, transform: Affine) {
    let Some(path) = skia_path(&shape.path) else {
        return;
    };
    let transform = skia_transform(transform);
    let mut paint = Paint::default();
    if let Some(fill) = shape.fill {
        let c = fill.with_opacity(opacity);
        paint.set_color_rgba8(c.r, c.g, c.b, c.a);
        pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
    }
    if let Some((color, width)) = shape.stroke {
        let c = color.with_opacity(opacity);
        paint.set_color_rgba8(c.r, c.g, c.b, c.a);
        let stroke = Stroke {
            width: width as f32,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, transform, None);
    }
}

/// Draw an image stretched over the element box.
fn paint_image(pixmap: &mut Pixmap, image: &DecodedImage, element: &Element, transform: Affine) {
    let Some(source) = premultiplied_pixmap(image) else {
        return;
    };
    let fit = Affine::scale_non_uniform(element.width / image.width as f64, element.height / image.height as f64);
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..Default::default()
    };
    pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, skia_transform(transform * fit), None);
}

fn paint_background_image(pixmap: &mut Pixmap, image: &DecodedImage, mode: ImageMode, scale: f64) {
    let Some(source) = premultiplied_pixmap(image) else {
        return;
    };
    let (pw, ph) = (pixmap.width() as f64, pixmap.height() as f64);
    let (iw, ih) = (image.width as f64, image.height as f64);
    match mode {
        ImageMode::Cover | ImageMode::Contain => {
            let fit = if mode == ImageMode::Cover {
                let crop = cover_crop(iw, ih, pw, ph);
                pw / crop.width()
            } else {
                (pw / iw).min(ph / ih)
            };
            let offset = ((pw - iw * fit) / 2.0, (ph - ih * fit) / 2.0);
            let transform = Affine::translate(offset) * Affine::scale(fit);
            let paint = PixmapPaint {
                quality: FilterQuality::Bilinear,
                ..Default::default()
            };
            pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, skia_transform(transform), None);
        }
        ImageMode::Repeat => {
            let Some(rect) = tiny_skia::Rect::from_xywh(0.0, 0.0, pw as f32, ph as f32) else {
                return;
            };
            let shader = Pattern::new(
                source.as_ref(),
                SpreadMode::Repeat,
                FilterQuality::Bilinear,
                1.0,
                Transform::from_scale(scale as f32, scale as f32),
            );
            let paint = Paint {
                shader,
                ..Default::default()
            };
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }
}

fn premultiplied_pixmap(image: &DecodedImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(image.width, image.height)?;
    let mut data = image.rgba.clone();
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 127) / 255) as u8;
        }
    }
    Pixmap::from_vec(data, size)
}

/// SVG document drawing `props` in a `width`×`height` box, lines hanging from the top.
fn text_svg(props: &TextProps, width: f64, height: f64) -> String {
    let (x, anchor) = match props.text_align {
        TextAlign::Left => (0.0, "start"),
        TextAlign::Center => (width / 2.0, "middle"),
        TextAlign::Right => (width, "end"),
    };
    let fill = Rgba { a: 255, ..props.color };
    let mut svg = String::with_capacity(256 + props.content.len());
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\">",
        width.max(1.0),
        height.max(1.0)
    ));
    svg.push_str(&format!(
        "<text font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" font-style=\"{}\" letter-spacing=\"{}\" text-anchor=\"{}\" fill=\"{}\" fill-opacity=\"{}\"",
        escape_xml(&props.font_family),
        props.font_size,
        props.font_weight.value(),
        props.font_style.name(),
        props.letter_spacing,
        anchor,
        fill.to_hex(),
        props.color.a as f64 / 255.0,
    ));
    if props.text_decoration != TextDecoration::None {
        svg.push_str(&format!(" text-decoration=\"{}\"", props.text_decoration.name()));
    }
    svg.push('>');
    for (i, line) in props.content.lines().enumerate() {
        let y = i as f64 * props.line_advance() + props.font_size * ASCENT_RATIO;
        svg.push_str(&format!(
            "<tspan x=\"{}\" y=\"{}\" xml:space=\"preserve\">{}</tspan>",
            x,
            y,
            escape_xml(line)
        ));
    }
    svg.push_str("</text></svg>");
    svg
}

/// Escape markup and drop characters XML 1.0 cannot carry.
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars().filter(|&c| is_xml_char(c)) {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}

/// Encode a pixmap as PNG with straight alpha.
pub fn encode_png(pixmap: &Pixmap) -> ExportResult<Vec<u8>> {
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&rgba)?;
    }
    Ok(buf)
}

/// Encode a pixmap as JPEG, flattened onto white.
pub fn encode_jpeg(pixmap: &Pixmap, quality: u8) -> ExportResult<Vec<u8>> {
    let mut rgb = Vec::with_capacity(pixmap.data().len() / 4 * 3);
    for px in pixmap.pixels() {
        // Premultiplied source over opaque white
        let under = 255 - px.alpha();
        rgb.extend_from_slice(&[px.red() + under, px.green() + under, px.blue() + under]);
    }

    let mut buf = std::io::Cursor::new(Vec::new());
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.write_image(&rgb, pixmap.width(), pixmap.height(), image::ColorType::Rgb8.into())?;
    Ok(buf.into_inner())
}

fn skia_color(c: Rgba) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn skia_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

fn skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32),
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}
