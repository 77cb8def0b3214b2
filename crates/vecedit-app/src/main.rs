//! VecEdit 命令行入口
//!
//! - `convert`: 旧矢量文件（AI/EPS/CDR/PDF）转分层 SVG
//! - `inspect`: 列出 SVG 的图层和图元
//! - `edit`: 打开文件，执行编辑脚本，保存为 SVG
//! - `demo`: 在空白文档上执行内置脚本

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use config::AppConfig;
use vecedit_core::document::Document;
use vecedit_file::{convert_file, Conversion, DeclaredFormat, NoRemote};
use vecedit_ui::Editor;

/// 内置演示脚本
const DEMO_SCRIPT: &str = "\
# 矩形、圆、箭头和一段文本
tool rectangle
drag 100 100 300 220
color #0000ff
tool circle
drag 500 160 560 160
tool arrow
drag 300 160 440 160
tool text
down 120 260
type VecEdit demo
key enter
# 新图层上的手绘路径
layer add Sketch
tool pen
penmode freehand
color red
drag 100 400 400 450
";

#[derive(Debug, Parser)]
#[command(name = "vecedit", version, about = "Layered vector editing and legacy format import")]
struct Cli {
    /// JSON 配置文件
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert an AI/EPS/CDR/PDF file into layered SVG
    Convert {
        input: PathBuf,
        /// Declared source format; inferred from the extension when omitted
        #[arg(short, long)]
        format: Option<DeclaredFormat>,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip the configured remote converter
        #[arg(long)]
        local: bool,
    },
    /// List the layers and primitives of an SVG file
    Inspect {
        input: PathBuf,
        /// Dump the parsed document as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply an editing script to a file and save the result as SVG
    Edit {
        input: PathBuf,
        #[arg(short, long)]
        script: PathBuf,
        #[arg(short, long)]
        format: Option<DeclaredFormat>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        local: bool,
    },
    /// Run the built-in demo script on a blank document
    Demo {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default(cli.config.as_deref())?;
    init_tracing(&config.log_level)?;

    info!("Starting VecEdit...");
    run(cli.command, &config).await
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).with_context(|| format!("Invalid log level '{}'", level))?,
    };
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )?;
    Ok(())
}

async fn run(command: Commands, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Convert {
            input,
            format,
            output,
            local,
        } => {
            let conversion = import(&input, format, config, local).await?;
            info!(
                "Converted {} via {:?}: {} layers, {} primitives",
                input.display(),
                conversion.source,
                conversion.document.layer_count(),
                conversion.document.primitive_count()
            );
            write_output(output.as_deref(), &conversion.svg).await
        }
        Commands::Inspect { input, json } => {
            let document = load_svg(&input).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&document)?);
            } else {
                print!("{}", describe(&document));
            }
            Ok(())
        }
        Commands::Edit {
            input,
            script,
            format,
            output,
            local,
        } => {
            let document = open_document(&input, format, config, local).await?;
            let script = tokio::fs::read_to_string(&script)
                .await
                .with_context(|| format!("Failed to read script {}", script.display()))?;
            let svg = run_script(document, &script, config)?;
            write_output(output.as_deref(), &svg).await
        }
        Commands::Demo { output } => {
            let svg = run_script(Document::new(), DEMO_SCRIPT, config)?;
            write_output(output.as_deref(), &svg).await
        }
    }
}

/// 远程转换 → 本地提取 → 占位文档
async fn import(path: &Path, format: Option<DeclaredFormat>, config: &AppConfig, local: bool) -> Result<Conversion> {
    let options = config.convert_options();
    let conversion = match config.remote().filter(|_| !local) {
        Some(remote) => convert_file(path, format, &remote, &options).await,
        None => convert_file(path, format, &NoRemote, &options).await,
    };
    conversion.with_context(|| format!("Failed to convert {}", path.display()))
}

async fn load_svg(path: &Path) -> Result<Document> {
    let markup = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    vecedit_file::deserialize(&markup).with_context(|| format!("Failed to parse {}", path.display()))
}

/// `.svg` 直接读回，其他扩展名走导入流水线
async fn open_document(
    path: &Path,
    format: Option<DeclaredFormat>,
    config: &AppConfig,
    local: bool,
) -> Result<Document> {
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg && format.is_none() {
        load_svg(path).await
    } else {
        Ok(import(path, format, config, local).await?.document)
    }
}

fn run_script(document: Document, script: &str, config: &AppConfig) -> Result<String> {
    let mut editor = Editor::new(config.editor_settings()?);
    editor.open(Some(document));

    let registry = config.registry()?;
    let steps = registry.run_script(&mut editor, script)?;

    let (layers, svg) = editor.save().context("No document open")?;
    info!(
        "Applied {} script steps: {} layers, {} primitives",
        steps,
        layers.len(),
        layers.iter().map(|l| l.len()).sum::<usize>()
    );
    Ok(svg)
}

async fn write_output(path: Option<&Path>, svg: &str) -> Result<()> {
    match path {
        Some(path) => {
            tokio::fs::write(path, svg)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Saved file: {}", path.display());
        }
        None => print!("{}", svg),
    }
    Ok(())
}

/// 图层和图元的文本摘要
fn describe(document: &Document) -> String {
    let mut out = String::new();
    for layer in document.layers() {
        let mut flags = Vec::new();
        if !layer.visible {
            flags.push("hidden");
        }
        if layer.locked {
            flags.push("locked");
        }
        if layer.id == document.active_layer_id() {
            flags.push("active");
        }
        out.push_str(&format!(
            "{} \"{}\" [{}] {} primitives\n",
            layer.id,
            layer.name,
            flags.join(", "),
            layer.len()
        ));
        for primitive in &layer.primitives {
            let bb = primitive.shape.bounding_box();
            out.push_str(&format!(
                "  {} {} ({}, {}) {}x{}\n",
                primitive.id,
                primitive.shape.type_name(),
                bb.min.x,
                bb.min.y,
                bb.width(),
                bb.height()
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["vecedit", "convert", "in.bin", "--format", "eps", "-o", "out.svg"]).unwrap();
        match cli.command {
            Commands::Convert { format, output, .. } => {
                assert_eq!(format, Some(DeclaredFormat::Eps));
                assert_eq!(output, Some(PathBuf::from("out.svg")));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["vecedit", "convert", "in.ai", "--format", "dxf"]).is_err());
    }

    #[tokio::test]
    async fn test_convert_eps_to_svg() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("drawing.eps");
        let output = dir.path().join("drawing.svg");
        std::fs::write(&input, "newpath 10 10 moveto 20 30 lineto stroke\n").unwrap();

        run(
            Commands::Convert {
                input,
                format: None,
                output: Some(output.clone()),
                local: false,
            },
            &AppConfig::default(),
        )
        .await
        .unwrap();

        let document = load_svg(&output).await.unwrap();
        assert_eq!(document.layer_count(), 1);
        assert_eq!(document.primitive_count(), 1);
    }

    #[tokio::test]
    async fn test_convert_cdr_yields_placeholder() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("logo.cdr");
        std::fs::write(&input, b"RIFF\0\0\0\0CDR").unwrap();

        let conversion = import(&input, None, &AppConfig::default(), true).await.unwrap();
        assert_eq!(conversion.source, vecedit_file::ConversionSource::Placeholder);
        assert!(conversion.svg.contains("CDR file converted"));
    }

    #[tokio::test]
    async fn test_edit_applies_script() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.svg");
        let script = dir.path().join("edit.txt");
        let output = dir.path().join("out.svg");
        std::fs::write(&input, vecedit_file::serialize(Document::new().layers())).unwrap();
        std::fs::write(&script, "tool rectangle\ndrag 10 10 60 40\n").unwrap();

        run(
            Commands::Edit {
                input,
                script,
                format: None,
                output: Some(output.clone()),
                local: true,
            },
            &AppConfig::default(),
        )
        .await
        .unwrap();

        let document = load_svg(&output).await.unwrap();
        assert_eq!(document.primitive_count(), 1);
        assert!(describe(&document).contains("rect (10, 10) 50x30"));
    }

    #[test]
    fn test_demo_script_runs() {
        let svg = run_script(Document::new(), DEMO_SCRIPT, &AppConfig::default()).unwrap();
        let document = vecedit_file::deserialize(&svg).unwrap();
        assert_eq!(document.layer_count(), 2);
        assert_eq!(document.primitive_count(), 5);
    }

    #[test]
    fn test_script_uses_configured_aliases() {
        let config = AppConfig {
            script_aliases: [("box".to_string(), "DRAG".to_string())].into_iter().collect(),
            ..AppConfig::default()
        };
        let svg = run_script(Document::new(), "tool rectangle\nbox 10 10 40 40\n", &config).unwrap();
        assert_eq!(vecedit_file::deserialize(&svg).unwrap().primitive_count(), 1);

        let err = run_script(Document::new(), "boks 10 10 40 40\n", &config).unwrap_err();
        assert!(err.to_string().contains("unknown command 'boks'"));
    }

    #[tokio::test]
    async fn test_missing_input_reports_path() {
        let err = load_svg(Path::new("/nonexistent/in.svg")).await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/in.svg"));
    }
}
