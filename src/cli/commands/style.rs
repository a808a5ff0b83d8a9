use clap::Subcommand;
use serde_json::json;
use std::path::PathBuf;

use crate::cli::utils::{output_list, output_success};
use crate::cli::OutputFormat;
use crate::ui::style::{ConfigStore, StyleSwitcher};

#[derive(Subcommand)]
pub enum StyleCommands {
    #[command(about = "List available styles")]
    List {
        #[arg(long, default_value = "ui-config.json", help = "UI config file")]
        file: PathBuf,
    },

    #[command(about = "Select the active style")]
    Set {
        #[arg(help = "Style name (new-york or default)")]
        name: String,
        #[arg(long, default_value = "ui-config.json", help = "UI config file")]
        file: PathBuf,
    },
}

pub async fn handle(cmd: StyleCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        StyleCommands::List { file } => {
            let store = ConfigStore::open(&file)?;
            let switcher = StyleSwitcher::new(&store);
            let selected = switcher.selected();
            let items: Vec<(&str, &str)> = switcher.options().iter().map(|s| (s.name, s.label)).collect();
            output_list(&output_format, "styles", &items, Some(selected.as_str()))
        }
        StyleCommands::Set { name, file } => {
            let store = ConfigStore::open(&file)?;
            let config = StyleSwitcher::new(&store).select(&name)?;
            output_success(
                &output_format,
                &format!("Style set to '{}'", config.style),
                Some(json!({ "config": config })),
            )
        }
    }
}
