//! Replay harness for the history coordination protocol.
//!
//! Reads a JSON-lines script of user operations (edits, undos, redos, and
//! the state changes that happen between them), drives a full actor set
//! through it, and reports the final counter and stack depths. Useful for
//! reproducing coordination bugs outside the UI.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use cellscribe::{
    ChannelBackendSync, EditRequest, HistoryConfig, ImageViewActor, LabelSelectActor, Supervisor,
    ToolActor, ToolKind, ViewportActor,
};

#[derive(Parser)]
#[command(
    name = "cellscribe",
    version,
    about = "Replay a scripted annotation session against the history protocol"
)]
struct Args {
    /// JSON-lines script of operations to replay
    #[arg(long)]
    script: PathBuf,
    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the round timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum ScriptOp {
    Edit {
        name: String,
        #[serde(default)]
        args: serde_json::Value,
    },
    Undo,
    Redo,
    Pan {
        dx: f64,
        dy: f64,
    },
    Zoom {
        zoom: f64,
    },
    SetFrame {
        frame: usize,
    },
    SelectTool {
        tool: ToolKind,
    },
    SelectLabel {
        foreground: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => HistoryConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => HistoryConfig::default(),
    };
    if let Some(timeout_ms) = args.timeout_ms {
        config.round_timeout_ms = Some(timeout_ms);
    }

    // Stand-in for the network layer: log every backend sync trigger.
    let (relay, mut triggers) = ChannelBackendSync::new(config.channel_capacity);
    tokio::spawn(async move {
        while let Some(trigger) = triggers.recv().await {
            tracing::info!(?trigger, "backend sync trigger");
        }
    });

    let mut supervisor = Supervisor::new(Arc::new(relay), config);
    let viewport = ViewportActor::new();
    let image_view = ImageViewActor::new();
    let tool = ToolActor::new();
    let labels = LabelSelectActor::new();
    supervisor.add_actor(viewport.clone());
    supervisor.add_actor(image_view.clone());
    supervisor.add_actor(tool.clone());
    supervisor.add_actor(labels.clone());

    let script = fs::read_to_string(&args.script)
        .with_context(|| format!("reading script {}", args.script.display()))?;

    for (lineno, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let op: ScriptOp = serde_json::from_str(line)
            .with_context(|| format!("parsing script line {}", lineno + 1))?;
        match op {
            ScriptOp::Edit { name, args } => {
                supervisor
                    .edit(EditRequest::new(name).with_args(args))
                    .await?;
            }
            ScriptOp::Undo => {
                if !supervisor.undo().await? {
                    tracing::info!("undo ignored, nothing to roll back");
                }
            }
            ScriptOp::Redo => {
                if !supervisor.redo().await? {
                    tracing::info!("redo ignored, nothing to replay");
                }
            }
            ScriptOp::Pan { dx, dy } => viewport.pan(dx, dy),
            ScriptOp::Zoom { zoom } => viewport.set_zoom(zoom),
            ScriptOp::SetFrame { frame } => image_view.set_frame(frame),
            ScriptOp::SelectTool { tool: kind } => tool.select_tool(kind),
            ScriptOp::SelectLabel { foreground } => labels.select_foreground(foreground),
        }
    }

    let status = supervisor.status();
    println!("state: {:?}", status.state);
    println!("action: {} / {}", status.action, status.num_actions);
    for tracker in supervisor.trackers() {
        let stats = tracker.stats().await?;
        println!(
            "{}: past={} future={} cursor={}",
            tracker.name(),
            stats.past,
            stats.future,
            stats.cursor
        );
    }
    println!("viewport: {:?}", viewport.view());
    println!("image-view: {:?}", image_view.view());
    println!("tool: {:?}", tool.tool());
    println!("labels: {:?}", labels.selection());

    Ok(())
}
