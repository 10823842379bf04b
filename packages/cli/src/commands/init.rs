use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use xb_editor::{EditorConfig, DEFAULT_CONFIG_NAME};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Past entries kept per slice (0 = unlimited)
    #[arg(long, default_value_t = 100)]
    pub history_limit: usize,

    /// Region new pages start with
    #[arg(short, long, default_value = "content")]
    pub region: String,

    /// Generate sequential ids instead of random UUIDs
    #[arg(short, long)]
    pub deterministic: bool,

    /// Layout file to create
    #[arg(short, long, default_value = "layout.json")]
    pub layout: PathBuf,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing page...".bright_blue().bold());

    let config = EditorConfig {
        history_limit: args.history_limit,
        default_region: args.region.clone(),
        deterministic_ids: args.deterministic,
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    let layout_path = super::resolve(cwd, &args.layout);
    if !layout_path.exists() {
        fs::write(&layout_path, serde_json::to_string_pretty(&config.initial_layout())?)?;
        println!("  {} Created {}", "✓".green(), args.layout.display());
    }

    println!();
    println!("{}", "✅ Page initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: xb inspect {}", args.layout.display());
    println!("  2. Run: xb replay {} script.json --out result.json", args.layout.display());

    Ok(())
}
