//! ppm list コマンド
//!
//! `config.json` に登録されているプラグインを表示する。

use crate::cli::GlobalArgs;
use crate::config::BaseDir;
use crate::registry::ConfigRegistry;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;

#[derive(Debug, Parser)]
pub struct Args {
    /// Output only plugin names
    #[arg(long)]
    pub simple: bool,
}

#[derive(Debug, Clone, Serialize)]
struct PluginRow {
    name: String,
    enabled: bool,
}

pub fn run(args: Args, global: &GlobalArgs) -> Result<(), String> {
    let base = BaseDir::resolve(global.base_dir.clone()).map_err(|e| e.to_string())?;
    let registry = ConfigRegistry::load(base).map_err(|e| e.to_string())?;

    let rows: Vec<PluginRow> = registry
        .plugins()
        .map(|(name, enabled)| PluginRow {
            name: name.to_string(),
            enabled,
        })
        .collect();

    if global.json {
        let json = serde_json::to_string_pretty(&rows).map_err(|e| e.to_string())?;
        println!("{}", json);
    } else if args.simple {
        for row in &rows {
            println!("{}", row.name);
        }
    } else if rows.is_empty() {
        println!("No plugins installed");
    } else {
        println!("{}", render_table(&rows));
    }

    Ok(())
}

fn render_table(rows: &[PluginRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Plugin", "Enabled"]);
    for row in rows {
        table.add_row(vec![
            row.name.clone(),
            if row.enabled { "yes" } else { "no" }.to_string(),
        ]);
    }
    table
}
