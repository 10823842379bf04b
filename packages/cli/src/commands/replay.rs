use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use xb_editor::{
    Action, DispatchResult, EditSession, EditorConfig, HistoryIntent, PageData, SliceTag,
};
use xb_layout::RootLayoutModel;

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Layout JSON file to start from
    pub layout: PathBuf,

    /// JSON array of actions
    pub script: PathBuf,

    /// Write the resulting layout, model and page data here
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Generate sequential ids instead of random UUIDs
    #[arg(short, long)]
    pub deterministic: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplayOutput<'a> {
    #[serde(flatten)]
    root: RootLayoutModel,
    page_data: &'a PageData,
    undo_stack: &'a [SliceTag],
    redo_stack: Vec<SliceTag>,
}

pub fn replay(args: ReplayArgs, cwd: &str) -> Result<()> {
    let mut config = EditorConfig::load(cwd)?;
    config.deterministic_ids |= args.deterministic;

    let root = super::read_layout(&super::resolve(cwd, &args.layout))?;
    let script_path = super::resolve(cwd, &args.script);
    let script = fs::read_to_string(&script_path)
        .with_context(|| format!("Cannot read {}", script_path.display()))?;
    let actions: Vec<Action> = serde_json::from_str(&script)
        .with_context(|| format!("{} is not a list of actions", args.script.display()))?;

    println!("▶️  {} {} actions", "Replaying".green().bold(), actions.len());
    println!();

    let mut session = EditSession::new("replay", &config);
    session.hydrate(root, PageData::new())?;

    for (step, action) in actions.into_iter().enumerate() {
        let name = action.name();
        let result = session.dispatch(action)?;
        println!("   {:>3} {:<18} {}", step + 1, name, describe(&result));
    }

    info!(
        undo = session.coordinator().undo_stack().len(),
        redo = session.coordinator().redo_stack().len(),
        "Replay finished"
    );

    println!();
    println!("   Undo stack: {}", format_stack(session.coordinator().undo_stack()));
    println!("   Redo stack: {}", format_stack(&session.coordinator().redo_stack()));

    if let Some(out) = &args.out {
        let output = ReplayOutput {
            root: session.layout_model().to_root(),
            page_data: session.page_data(),
            undo_stack: session.coordinator().undo_stack(),
            redo_stack: session.coordinator().redo_stack(),
        };
        fs::write(super::resolve(cwd, out), serde_json::to_string_pretty(&output)?)?;
        println!();
        println!("✨ {} {}", "Wrote".green().bold(), out.display());
    }

    Ok(())
}

fn describe(result: &DispatchResult) -> String {
    let mut summary = match result.intent {
        Some(HistoryIntent::Record(tag)) => format!("{} {:?}", "recorded".green(), tag),
        Some(HistoryIntent::Undo(tag)) => format!("{} {:?}", "undo".yellow(), tag),
        Some(HistoryIntent::Redo(tag)) => format!("{} {:?}", "redo".yellow(), tag),
        None if result.changed => "applied without history".dimmed().to_string(),
        None => "no change".dimmed().to_string(),
    };
    if !result.inserted.is_empty() {
        summary.push_str(&format!(" → {}", result.inserted.join(", ")));
    }
    if let Some(err) = &result.preview_error {
        summary.push_str(&format!(" ({} {})", "preview:".red(), err));
    }
    summary
}

fn format_stack(stack: &[SliceTag]) -> String {
    if stack.is_empty() {
        return "(empty)".dimmed().to_string();
    }
    stack
        .iter()
        .map(|tag| format!("{:?}", tag))
        .collect::<Vec<_>>()
        .join(" ")
}
