//! 程序入口：初始化日志，读取JSON文件，驱动一个属性树编辑器并输出编辑结果

use std::{cell::RefCell, path::PathBuf, rc::Rc, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing_subscriber::fmt::SubscriberBuilder;

use json_prop_editor::model::convert::infer_schema;
use json_prop_editor::utils::{clipboard::copy_to_clipboard, fs::{read_json_file, write_json_file}, jsonpath::extract_subtree_pretty};
use json_prop_editor::vm::bridge::{empty_placeholder, title};
use json_prop_editor::{EditorMode, JsonEditor, Preset, PropertyPath};

/// JSON/Schema 属性树编辑器
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// 输入的JSON文件（缺省为空对象）
    file: Option<PathBuf>,

    /// 编辑模式：schema 或 value
    #[arg(long, default_value = "value")]
    mode: EditorMode,

    /// 使用预设整体替换内容（仅 value 模式）：bearer, api-key, basic, other
    #[arg(long)]
    preset: Option<Preset>,

    /// 设置顶层属性（仅 value 模式），格式 KEY=VALUE，可重复
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// 把输入当作样例值并推断Schema
    #[arg(long)]
    infer: bool,

    /// 只输出匹配该 JSONPath 的子树
    #[arg(long, value_name = "JSONPATH")]
    extract: Option<String>,

    /// 将完整结果写入文件
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// 将输出复制到剪贴板
    #[arg(long)]
    copy: bool,

    /// 输出调试日志
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志输出
    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let _ = SubscriberBuilder::default()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();

    let input = match &cli.file {
        Some(path) => Some(read_json_file(path).with_context(|| format!("读取 {} 失败", path.display()))?),
        None => None,
    };

    if cli.infer {
        let sample = input
            .as_ref()
            .and_then(Value::as_object)
            .ok_or_else(|| anyhow!("推断Schema需要一个JSON对象样例"))?;
        let schema = Value::Object(infer_schema(sample)?);
        tracing::info!("已从样例推断Schema: {} 个顶层属性", sample.len());
        return finish(&cli, &schema);
    }

    let latest: Rc<RefCell<Option<Arc<Value>>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&latest);
    let mut editor = JsonEditor::new(cli.mode, move |value| *sink.borrow_mut() = Some(value))
        .with_error_callback(|message| {
            if let Some(message) = message {
                tracing::warn!("编辑器报告: {}", message);
            }
        })
        .mount(input.map(Arc::new));
    if let Some(message) = editor.error() {
        bail!(message.to_string());
    }

    if let Some(preset) = cli.preset {
        if editor.mode() != EditorMode::Value {
            bail!("--preset 仅支持 value 模式");
        }
        editor.apply_preset(preset);
    }
    for assignment in &cli.set {
        apply_assignment(&mut editor, assignment)?;
    }
    if let Some(message) = editor.error() {
        bail!(message.to_string());
    }

    // 与宿主界面一样把发出的值回传给编辑器
    let emitted = latest.borrow().clone();
    if emitted.is_some() {
        editor.sync_external(emitted);
    }

    log_outline(&editor);
    let output = editor.snapshot()?;
    finish(&cli, &output)
}

/// 处理一条 KEY=VALUE：已有同名顶层属性则改值，否则新增
fn apply_assignment(editor: &mut JsonEditor, assignment: &str) -> Result<()> {
    if editor.mode() != EditorMode::Value {
        bail!("--set 仅支持 value 模式");
    }
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| anyhow!("无效的赋值: {}（应为 KEY=VALUE）", assignment))?;

    let index = match editor.properties().iter().position(|p| p.key == key) {
        Some(index) => index,
        None => {
            editor.add_property();
            let index = editor.properties().len() - 1;
            editor.set_key(&PropertyPath::root(index), key)?;
            index
        }
    };
    editor.set_value(&PropertyPath::root(index), Value::String(value.to_string()))?;
    tracing::debug!("设置 {} = {}", key, value);
    Ok(())
}

fn log_outline(editor: &JsonEditor) {
    tracing::info!("{}", title(editor.mode()));
    let rows = editor.outline();
    if rows.is_empty() {
        tracing::info!("{}", empty_placeholder(editor.mode()));
        return;
    }
    for row in rows {
        tracing::info!(
            "{}{} [{}] {}  ({})",
            "  ".repeat(row.depth as usize),
            if row.key.is_empty() { "<空键>" } else { row.key.as_str() },
            row.kind,
            row.preview,
            row.path
        );
    }
}

fn finish(cli: &Cli, output: &Value) -> Result<()> {
    if let Some(path) = &cli.out {
        write_json_file(path, output).with_context(|| format!("写入 {} 失败", path.display()))?;
        tracing::info!("结果已保存: {}", path.display());
    }

    let text = match &cli.extract {
        Some(json_path) => extract_subtree_pretty(output, json_path)?,
        None => serde_json::to_string_pretty(output)?,
    };
    if cli.out.is_none() || cli.extract.is_some() {
        println!("{}", text);
    }

    if cli.copy {
        if let Err(e) = copy_to_clipboard(&text) {
            tracing::error!("复制失败: {}", e);
        }
    }
    Ok(())
}
