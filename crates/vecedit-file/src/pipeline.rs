//! 导入流水线
//!
//! 远程转换（可选，只尝试一次）→ 本地启发式提取 → 占位文档。
//! 任何一步失败都落到下一步，最终总能得到一个文档。

use crate::error::FileError;
use crate::extract::extract;
use crate::fallback::placeholder_document;
use crate::format::DeclaredFormat;
use crate::svg::{deserialize, serialize};
use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use vecedit_core::document::Document;
use vecedit_core::layer::{Layer, LayerId};
use vecedit_core::primitive::{Drawable, Primitive, PrimitiveId};

/// 远程转换默认超时
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// 远程转换服务：把原始字节转换成 SVG
pub trait RemoteConverter {
    fn convert(&self, bytes: &[u8], format: DeclaredFormat) -> impl Future<Output = Result<String, FileError>> + Send;

    /// 是否真正配置了远程服务
    fn is_enabled(&self) -> bool {
        true
    }
}

/// 未配置远程服务
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRemote;

impl RemoteConverter for NoRemote {
    fn convert(&self, _bytes: &[u8], _format: DeclaredFormat) -> impl Future<Output = Result<String, FileError>> + Send {
        async { Err(FileError::Remote("no remote converter configured".into())) }
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// 调用外部程序转换：原始字节写入 stdin，从 stdout 读取 SVG
///
/// 参数中的 `{format}` 会被替换成格式标签（ai/eps/cdr/pdf）。
#[derive(Debug, Clone)]
pub struct CommandConverter {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandConverter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// 从 `["prog", "arg", ...]` 形式构造
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

impl RemoteConverter for CommandConverter {
    fn convert(&self, bytes: &[u8], format: DeclaredFormat) -> impl Future<Output = Result<String, FileError>> + Send {
        let program = self.program.clone();
        let args: Vec<String> = self.args.iter().map(|a| a.replace("{format}", format.tag())).collect();
        let input = bytes.to_vec();

        async move {
            let mut child = Command::new(&program)
                .args(&args)
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()?;

            // 写入和读取同时进行，否则转换器边读边写时两端都会卡在满管道上
            let stdin = child.stdin.take();
            let feed = async move {
                match stdin {
                    // 写完后 stdin 被丢弃，子进程读到 EOF
                    Some(mut stdin) => stdin.write_all(&input).await,
                    None => Ok(()),
                }
            };
            let (written, output) = tokio::join!(feed, child.wait_with_output());
            let output = output?;
            if let Err(e) = written {
                // 子进程可能不读完输入就退出，以退出码为准
                tracing::debug!("{} stopped reading stdin: {}", program, e);
            }
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(FileError::Remote(format!("{} exited with {}: {}", program, output.status, stderr.trim())));
            }
            String::from_utf8(output.stdout).map_err(|e| FileError::Remote(format!("non UTF-8 output: {}", e)))
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub remote_timeout: Duration,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }
}

/// 文档来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionSource {
    Remote,
    Extracted,
    Placeholder,
}

/// 转换结果
#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: Document,
    pub svg: String,
    pub source: ConversionSource,
}

impl Conversion {
    fn new(document: Document, source: ConversionSource) -> Self {
        let svg = serialize(document.layers());
        Self { document, svg, source }
    }
}

/// 完整流水线
pub async fn convert<R: RemoteConverter>(
    bytes: &[u8],
    format: DeclaredFormat,
    remote: &R,
    options: &ConvertOptions,
) -> Conversion {
    if remote.is_enabled() {
        match tokio::time::timeout(options.remote_timeout, remote.convert(bytes, format)).await {
            Ok(Ok(markup)) => match deserialize(&markup) {
                Ok(document) if document.primitive_count() > 0 => {
                    tracing::info!("Remote conversion succeeded: {} primitives", document.primitive_count());
                    return Conversion::new(document, ConversionSource::Remote);
                }
                Ok(_) => tracing::warn!("Remote conversion returned no primitives, falling back"),
                Err(e) => tracing::warn!("Remote conversion returned invalid SVG, falling back: {}", e),
            },
            Ok(Err(e)) => tracing::warn!("Remote conversion failed, falling back: {}", e),
            Err(_) => tracing::warn!("Remote conversion timed out after {:?}, falling back", options.remote_timeout),
        }
    }

    convert_local(bytes, format)
}

/// 只用本地启发式
pub fn convert_local(bytes: &[u8], format: DeclaredFormat) -> Conversion {
    let drawables = extract(bytes, format);
    if drawables.is_empty() {
        tracing::info!("Nothing extracted from {} input, using placeholder document", format);
        return Conversion::new(placeholder_document(format), ConversionSource::Placeholder);
    }
    Conversion::new(document_from_drawables(drawables, format), ConversionSource::Extracted)
}

/// 读取文件并转换；未指定格式时按扩展名推断
pub async fn convert_file<R: RemoteConverter>(
    path: &Path,
    format: Option<DeclaredFormat>,
    remote: &R,
    options: &ConvertOptions,
) -> Result<Conversion, FileError> {
    let format = match format {
        Some(format) => format,
        None => DeclaredFormat::from_path(path)?,
    };
    let bytes = tokio::fs::read(path).await?;
    tracing::info!("Converting {} as {} ({} bytes)", path.display(), format, bytes.len());
    Ok(convert(&bytes, format, remote, options).await)
}

/// 提取结果放进单个图层
pub fn document_from_drawables(drawables: Vec<Drawable>, format: DeclaredFormat) -> Document {
    let layer_id = LayerId(1);
    let mut layer = Layer::new(layer_id, format!("Imported {}", format));
    layer.primitives = drawables
        .into_iter()
        .enumerate()
        .map(|(i, drawable)| Primitive::from_drawable(PrimitiveId(i as u64 + 2), layer_id, drawable))
        .collect();
    Document::from_layers(vec![layer])
}

#[cfg(test)]
mod tests {
    use super::*;
    use vecedit_core::primitive::Shape;

    /// 固定返回一段 SVG 的远程服务
    struct FixedRemote(Result<String, String>);

    impl RemoteConverter for FixedRemote {
        fn convert(&self, _bytes: &[u8], _format: DeclaredFormat) -> impl Future<Output = Result<String, FileError>> + Send {
            let result = self.0.clone().map_err(FileError::Remote);
            async move { result }
        }
    }

    /// 永不返回的远程服务
    struct StalledRemote;

    impl RemoteConverter for StalledRemote {
        fn convert(&self, _bytes: &[u8], _format: DeclaredFormat) -> impl Future<Output = Result<String, FileError>> + Send {
            async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            }
        }
    }

    const EPS: &[u8] = b"%!PS-Adobe-3.0 EPSF-3.0\n10 10 moveto 90 90 lineto stroke\n";

    #[tokio::test]
    async fn test_remote_result_preferred() {
        let remote = FixedRemote(Ok(r#"<svg><circle cx="1" cy="1" r="1"/></svg>"#.into()));
        let conversion = convert(EPS, DeclaredFormat::Eps, &remote, &ConvertOptions::default()).await;
        assert_eq!(conversion.source, ConversionSource::Remote);
        assert_eq!(conversion.document.primitive_count(), 1);
        assert!(conversion.svg.contains("<circle"));
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_extraction() {
        let remote = FixedRemote(Err("HTTP 500".into()));
        let conversion = convert(EPS, DeclaredFormat::Eps, &remote, &ConvertOptions::default()).await;
        assert_eq!(conversion.source, ConversionSource::Extracted);
        assert!(matches!(conversion.document.primitives().next().map(|p| &p.shape), Some(Shape::Line(_))));
    }

    #[tokio::test]
    async fn test_empty_remote_svg_falls_back() {
        let remote = FixedRemote(Ok("<svg/>".into()));
        let conversion = convert(b"", DeclaredFormat::Cdr, &remote, &ConvertOptions::default()).await;
        assert_eq!(conversion.source, ConversionSource::Placeholder);
        assert_eq!(conversion.document.layer_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_timeout() {
        let options = ConvertOptions {
            remote_timeout: Duration::from_millis(50),
        };
        let conversion = convert(EPS, DeclaredFormat::Eps, &StalledRemote, &options).await;
        assert_eq!(conversion.source, ConversionSource::Extracted);
    }

    #[tokio::test]
    async fn test_no_remote_cdr_placeholder() {
        let conversion = convert(&[0u8; 64], DeclaredFormat::Cdr, &NoRemote, &ConvertOptions::default()).await;
        assert_eq!(conversion.source, ConversionSource::Placeholder);
        assert!(conversion.svg.contains(r#"data-layer-name="converted""#));
    }

    #[test]
    fn test_extracted_control_bytes_still_valid_svg() {
        let conversion = convert_local(b"%!PS-Adobe <text x=\"1\" y=\"2\">A\x01B</text>", DeclaredFormat::Ai);
        assert_eq!(conversion.source, ConversionSource::Extracted);

        let document = deserialize(&conversion.svg).unwrap();
        match document.primitives().next().map(|p| &p.shape) {
            Some(Shape::Text(text)) => assert_eq!(text.content, "AB"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(serialize(document.layers()), conversion.svg);
    }

    #[test]
    fn test_document_from_drawables() {
        let document = convert_local(EPS, DeclaredFormat::Eps).document;
        assert_eq!(document.layer_count(), 1);
        assert_eq!(document.layers()[0].name, "Imported EPS");
        assert!(document.primitives().all(|p| p.layer_id == document.layers()[0].id));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_converter_streams_large_input() {
        // 远超管道缓冲区，cat 会在读完输入之前就开始写输出
        let input = "<!-- padding -->\n".repeat(16 * 1024);
        assert!(input.len() > 64 * 1024);

        let converter = CommandConverter::new("cat", Vec::new());
        let output = tokio::time::timeout(Duration::from_secs(30), converter.convert(input.as_bytes(), DeclaredFormat::Ai))
            .await
            .expect("converter deadlocked")
            .unwrap();
        assert_eq!(output, input);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_converter_failure_reports_status() {
        let converter = CommandConverter::new("false", Vec::new());
        let err = converter.convert(b"data", DeclaredFormat::Eps).await.unwrap_err();
        assert!(matches!(err, FileError::Remote(_)));
    }

    #[test]
    fn test_command_converter_from_argv() {
        assert!(CommandConverter::from_argv(&[]).is_none());
        let converter = CommandConverter::from_argv(&["conv".into(), "--from={format}".into()]).unwrap();
        assert_eq!(converter.program, "conv");
        assert_eq!(converter.args, vec!["--from={format}".to_string()]);
    }
}
