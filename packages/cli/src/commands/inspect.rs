use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;
use xb_layout::{
    validate_layout_model, ComponentCounter, ComponentModels, ComponentNode, IntegrityIssue,
    RootLayoutModel,
};

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Layout JSON file (`{ layout, model }`)
    pub input: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn inspect(args: InspectArgs, cwd: &str) -> Result<()> {
    let path = super::resolve(cwd, &args.input);
    let root = super::read_layout(&path)?;
    let issues = validate_layout_model(&root);
    let counts = ComponentCounter::count_layout(&root.layout);

    match args.format.as_str() {
        "json" => {
            let report = json!({
                "regions": root.layout.len(),
                "components": counts.components,
                "slots": counts.slots,
                "issues": issues,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "text" => {
            println!("🔍 {} {}", "Inspecting".green().bold(), args.input.display());
            println!();
            print_tree(&root);
            println!();
            println!(
                "   {} regions, {} components, {} slots",
                root.layout.len(),
                counts.components,
                counts.slots
            );
            for issue in &issues {
                println!("   {} {}", "✗".red(), describe(issue));
            }
        }
        other => return Err(anyhow::anyhow!("Invalid format: {}. Use: text or json", other)),
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "{} integrity issue(s) in {}",
            issues.len(),
            args.input.display()
        ))
    }
}

fn print_tree(root: &RootLayoutModel) {
    for (index, region) in root.layout.iter().enumerate() {
        println!(
            "{} {} {}",
            region.id.bright_white().bold(),
            format!("({})", region.name).dimmed(),
            format!("{:?}", [index]).dimmed()
        );
        for (child, component) in region.components.iter().enumerate() {
            print_component(component, &root.model, &[index, child], 1);
        }
    }
}

fn print_component(component: &ComponentNode, model: &ComponentModels, path: &[usize], depth: usize) {
    let indent = "  ".repeat(depth);
    let marker = if model.contains_key(&component.uuid) {
        "●".green()
    } else {
        "○".red()
    };
    println!(
        "{}{} {} {} {}",
        indent,
        marker,
        component.uuid,
        component.component_type.cyan(),
        format!("{:?}", path).dimmed()
    );

    for (slot_index, slot) in component.slots.iter().enumerate() {
        let mut slot_path = path.to_vec();
        slot_path.push(slot_index);
        println!(
            "{}  {} {}",
            indent,
            format!("#{}", slot.name).yellow(),
            format!("{:?}", slot_path).dimmed()
        );

        for (child_index, child) in slot.components.iter().enumerate() {
            let mut child_path = slot_path.clone();
            child_path.push(child_index);
            print_component(child, model, &child_path, depth + 2);
        }
    }
}

fn describe(issue: &IntegrityIssue) -> String {
    match issue {
        IntegrityIssue::MissingModel { uuid } => format!("{} has no model entry", uuid),
        IntegrityIssue::OrphanModel { uuid } => format!("model entry {} has no component", uuid),
        IntegrityIssue::DuplicateUuid { uuid } => format!("{} appears more than once", uuid),
        IntegrityIssue::SlotIdMismatch { slot_id, expected } => {
            format!("slot {} should be {}", slot_id, expected)
        }
    }
}
