//! Subcommand implementations.

use clap::{Args, Subcommand, ValueEnum};
use composer_core::{
    Background, CanvasPreset, CanvasSize, CaptureSlot, ConfigError, Editor, EditorConfig, ElementType, ImportFile,
    ProjectError, ProjectSettings, Rgba,
};
use composer_render::{ExportConfig, ExportError, ExportFormat, ExportScale, RotationPivot, SceneExporter};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot tell the export format of {}; pass --format", .0.display())]
    UnknownFormat(PathBuf),
    #[error("Unknown preset '{0}' (see `composer presets`)")]
    UnknownPreset(String),
    #[error("Invalid color '{0}'")]
    InvalidColor(String),
    #[error("No images were imported")]
    NothingImported,
}

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an empty project file.
    New(NewArgs),
    /// Print a summary of a project.
    Info {
        project: PathBuf,
    },
    /// List the canvas presets.
    Presets,
    /// Add image files to a project.
    Import {
        project: PathBuf,
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Render a project to PNG, JPEG or PDF.
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct NewArgs {
    pub path: PathBuf,
    /// Canvas preset, e.g. `a4` or `poster-small`.
    #[arg(long, conflicts_with_all = ["width", "height"])]
    pub preset: Option<String>,
    #[arg(long, default_value_t = 800)]
    pub width: u32,
    #[arg(long, default_value_t = 600)]
    pub height: u32,
    /// Solid background color as hex.
    #[arg(long)]
    pub background: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    pub project: PathBuf,
    #[arg(short, long)]
    pub output: PathBuf,
    /// Output format; inferred from the output extension when omitted.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=3))]
    pub scale: u32,
    /// JPEG quality (1-100).
    #[arg(long, default_value_t = 92, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,
    #[arg(long, value_enum, default_value_t = PivotArg::Center)]
    pub pivot: PivotArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Png,
    #[value(alias = "jpg")]
    Jpeg,
    Pdf,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => ExportFormat::Png,
            FormatArg::Jpeg => ExportFormat::Jpeg,
            FormatArg::Pdf => ExportFormat::Pdf,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PivotArg {
    Center,
    Origin,
}

impl From<PivotArg> for RotationPivot {
    fn from(arg: PivotArg) -> Self {
        match arg {
            PivotArg::Center => RotationPivot::Center,
            PivotArg::Origin => RotationPivot::Origin,
        }
    }
}

/// Lowercase, dash-separated preset name: "Poster (small)" becomes "poster-small".
pub fn preset_slug(preset: CanvasPreset) -> String {
    preset
        .name()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

pub fn find_preset(slug: &str) -> Option<CanvasPreset> {
    let slug = slug.to_ascii_lowercase();
    CanvasPreset::all().iter().copied().find(|p| preset_slug(*p) == slug)
}

/// Run `command`, writing human-readable output to `out`.
pub fn run(command: Command, config: Option<&Path>, out: &mut impl Write) -> CliResult<()> {
    let config = match config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    match command {
        Command::New(args) => new_project(args, config, out),
        Command::Info { project } => info(&project, config, out),
        Command::Presets => presets(out),
        Command::Import { project, images } => import(&project, &images, config, out),
        Command::Export(args) => export(args, config, out),
    }
}

fn open_editor(project: &Path, config: EditorConfig) -> CliResult<Editor> {
    let mut editor = Editor::with_config(CanvasSize::default(), config, CaptureSlot::default());
    editor.load_project(project)?;
    Ok(editor)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CliError + '_ {
    move |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn new_project(args: NewArgs, config: EditorConfig, out: &mut impl Write) -> CliResult<()> {
    if args.path.exists() && !args.force {
        return Err(CliError::Io {
            path: args.path,
            source: std::io::Error::new(std::io::ErrorKind::AlreadyExists, "file exists (use --force)"),
        });
    }
    let mut editor = Editor::with_config(CanvasSize::default(), config, CaptureSlot::default());
    match &args.preset {
        Some(slug) => {
            let preset = find_preset(slug).ok_or_else(|| CliError::UnknownPreset(slug.clone()))?;
            editor.apply_preset(preset);
        }
        None => {
            editor.reset_canvas_size(CanvasSize::new(args.width, args.height));
        }
    }
    if let Some(hex) = &args.background {
        let color = Rgba::parse(hex).ok_or_else(|| CliError::InvalidColor(hex.clone()))?;
        editor.set_background(Background::solid(color));
    }
    if let Some(name) = args.name {
        let settings = ProjectSettings {
            name,
            ..editor.settings().clone()
        };
        editor.update_settings(settings);
    }
    editor.save_project(&args.path)?;
    let size = editor.scene().canvas_size();
    writeln!(out, "Created {} ({}x{})", args.path.display(), size.width, size.height)
        .map_err(io_error(&args.path))?;
    Ok(())
}

fn info(project: &Path, config: EditorConfig, out: &mut impl Write) -> CliResult<()> {
    let editor = open_editor(project, config)?;
    let scene = editor.scene();
    let settings = editor.settings();
    let size = scene.canvas_size();

    let mut text = String::new();
    text.push_str(&format!("Name:        {}\n", settings.name));
    if !settings.author.is_empty() {
        text.push_str(&format!("Author:      {}\n", settings.author));
    }
    if !settings.description.is_empty() {
        text.push_str(&format!("Description: {}\n", settings.description));
    }
    text.push_str(&format!("Canvas:      {}x{}\n", size.width, size.height));
    let background = match scene.background() {
        Background::Solid { color } => format!("solid {}", color),
        Background::Gradient { colors, .. } => format!("gradient {} -> {}", colors[0], colors[1]),
        Background::Image { url, .. } => match url {
            Some(_) => "image".to_string(),
            None => "image (none set)".to_string(),
        },
    };
    text.push_str(&format!("Background:  {}\n", background));
    text.push_str(&format!("Elements:    {}\n", scene.len()));
    for ty in ElementType::all() {
        let count = scene.elements().iter().filter(|el| el.element_type() == *ty).count();
        if count > 0 {
            text.push_str(&format!("  {:<10} {}\n", ty.name(), count));
        }
    }
    let hidden = scene.elements().iter().filter(|el| !el.visible).count();
    let locked = scene.elements().iter().filter(|el| el.locked).count();
    if hidden + locked > 0 {
        text.push_str(&format!("  ({} hidden, {} locked)\n", hidden, locked));
    }
    out.write_all(text.as_bytes()).map_err(io_error(project))?;
    Ok(())
}

fn presets(out: &mut impl Write) -> CliResult<()> {
    let mut text = String::new();
    for preset in CanvasPreset::all() {
        let size = preset.size();
        text.push_str(&format!(
            "{:<16} {:<18} {}x{}\n",
            preset_slug(*preset),
            preset.name(),
            size.width,
            size.height
        ));
    }
    out.write_all(text.as_bytes()).map_err(io_error(Path::new("<stdout>")))?;
    Ok(())
}

fn import(project: &Path, images: &[PathBuf], config: EditorConfig, out: &mut impl Write) -> CliResult<()> {
    let mut editor = open_editor(project, config)?;
    let mut files = Vec::with_capacity(images.len());
    for path in images {
        let bytes = fs::read(path).map_err(io_error(path))?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        files.push(ImportFile::from_path_bytes(name, bytes));
    }

    let report = editor.import_images(&files);
    for (name, err) in &report.rejected {
        writeln!(out, "Skipped {}: {}", name, err).map_err(io_error(project))?;
    }
    if report.imported.is_empty() {
        return Err(CliError::NothingImported);
    }
    editor.save_project(project)?;
    writeln!(out, "Imported {} image(s) into {}", report.imported.len(), project.display())
        .map_err(io_error(project))?;
    Ok(())
}

fn export(args: ExportArgs, config: EditorConfig, out: &mut impl Write) -> CliResult<()> {
    let format = match args.format {
        Some(format) => format.into(),
        None => ExportFormat::from_path(&args.output).ok_or_else(|| CliError::UnknownFormat(args.output.clone()))?,
    };
    let editor = open_editor(&args.project, config)?;

    let export_config = ExportConfig::default()
        .with_format(format)
        .with_scale(ExportScale::try_from(args.scale)?)
        .with_jpeg_quality(args.quality)
        .with_pivot(args.pivot.into())
        .with_title(editor.settings().name.clone());
    let exporter = SceneExporter::new(export_config);
    let bytes = exporter.export_blocking(editor.scene())?;

    fs::write(&args.output, &bytes).map_err(io_error(&args.output))?;
    writeln!(out, "Wrote {} ({} bytes)", args.output.display(), bytes.len()).map_err(io_error(&args.output))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use composer_core::ProjectFile;
    use tempfile::TempDir;

    fn new_args(path: PathBuf) -> NewArgs {
        NewArgs {
            path,
            preset: None,
            width: 400,
            height: 300,
            background: None,
            name: None,
            force: false,
        }
    }

    fn run_ok(command: Command) -> String {
        let mut out = Vec::new();
        run(command, None, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn write_png(path: &Path, w: u32, h: u32) {
        image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_preset_slugs() {
        assert_eq!(preset_slug(CanvasPreset::PosterSmall), "poster-small");
        assert_eq!(preset_slug(CanvasPreset::A4), "a4");
        assert_eq!(find_preset("Phone-Wallpaper"), Some(CanvasPreset::PhoneWallpaper));
        assert_eq!(find_preset("letter"), None);
    }

    #[test]
    fn test_new_with_preset_and_background() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("poster.json");
        let args = NewArgs {
            preset: Some("square-small".into()),
            background: Some("#112233".into()),
            name: Some("Poster".into()),
            ..new_args(path.clone())
        };
        let output = run_ok(Command::New(args));
        assert!(output.contains("600x600"));

        let project = ProjectFile::load_file(&path).unwrap();
        assert_eq!(project.canvas.size(), CanvasSize::new(600, 600));
        assert_eq!(project.canvas.background, Background::solid(Rgba::rgb(0x11, 0x22, 0x33)));
        assert_eq!(project.settings.name, "Poster");
    }

    #[test]
    fn test_new_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("p.json");
        run_ok(Command::New(new_args(path.clone())));
        let mut out = Vec::new();
        let err = run(Command::New(new_args(path.clone())), None, &mut out).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
        run(Command::New(NewArgs { force: true, ..new_args(path) }), None, &mut out).unwrap();
    }

    #[test]
    fn test_import_then_info() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("p.json");
        run_ok(Command::New(new_args(project.clone())));
        let photo = dir.path().join("photo.png");
        write_png(&photo, 40, 20);
        let notes = dir.path().join("notes.txt");
        fs::write(&notes, "hello").unwrap();

        let output = run_ok(Command::Import {
            project: project.clone(),
            images: vec![photo, notes],
        });
        assert!(output.contains("Skipped notes.txt"));
        assert!(output.contains("Imported 1 image(s)"));

        let output = run_ok(Command::Info { project });
        assert!(output.contains("Canvas:      400x300"));
        assert!(output.contains("Elements:    1"));
    }

    #[test]
    fn test_import_nothing_is_an_error() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("p.json");
        run_ok(Command::New(new_args(project.clone())));
        let notes = dir.path().join("notes.txt");
        fs::write(&notes, "hello").unwrap();
        let mut out = Vec::new();
        let err = run(Command::Import { project, images: vec![notes] }, None, &mut out).unwrap_err();
        assert!(matches!(err, CliError::NothingImported));
    }

    #[test]
    fn test_export_infers_format() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("p.json");
        run_ok(Command::New(new_args(project.clone())));

        let output = dir.path().join("out.png");
        run_ok(Command::Export(ExportArgs {
            project: project.clone(),
            output: output.clone(),
            format: None,
            scale: 2,
            quality: 92,
            pivot: PivotArg::Center,
        }));
        let decoded = image::open(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (800, 600));

        let mut out = Vec::new();
        let err = run(
            Command::Export(ExportArgs {
                project,
                output: dir.path().join("out.bmp"),
                format: None,
                scale: 1,
                quality: 92,
                pivot: PivotArg::Center,
            }),
            None,
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::UnknownFormat(_)));
    }

    #[test]
    fn test_missing_project_fails() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();
        let err = run(
            Command::Info {
                project: dir.path().join("absent.json"),
            },
            None,
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Project(ProjectError::Io(_))));
    }
}
