//! List and Get commands: one-shot reads of the data folder.

use std::path::Path;

use console::style;

use super::{load_registry, resolve_data_folder};
use crate::query::Datasources;

/// Load the folder once and wrap it for querying.
fn open(data_folder: &Path) -> anyhow::Result<Datasources> {
    let root = resolve_data_folder(data_folder)?;
    let (registry, _) = load_registry(&root)?;
    Ok(Datasources::new(registry))
}

/// Run list command - print every datasource with its endpoint.
pub fn run_list(data_folder: &Path) -> anyhow::Result<()> {
    let datasources = open(data_folder)?.list_datasources();

    if datasources.is_empty() {
        println!("No datasources found in {}", data_folder.display());
        return Ok(());
    }

    let width = datasources
        .iter()
        .map(|d| d.endpoint.len())
        .max()
        .unwrap_or(0)
        + 1;
    for summary in &datasources {
        let endpoint = format!("/{:<width$}", summary.endpoint);
        println!("{}  {}", style(endpoint).green(), summary.source);
    }
    Ok(())
}

/// Pretty JSON for a datasource or one of its records, `None` when absent.
pub fn render(
    datasources: &Datasources,
    name: &str,
    id: Option<&str>,
) -> anyhow::Result<Option<String>> {
    let name = name.to_lowercase();
    let json = match id {
        Some(id) => match datasources.get_by_id(&name, id) {
            Some(record) => serde_json::to_string_pretty(&record)?,
            None => return Ok(None),
        },
        None => match datasources.get_all(&name) {
            Some(ds) => serde_json::to_string_pretty(ds.payload())?,
            None => return Ok(None),
        },
    };
    Ok(Some(json))
}

/// Run get command - print a datasource or one record.
///
/// Exits with status 1 when nothing matches.
pub fn run_get(data_folder: &Path, name: &str, id: Option<&str>) -> anyhow::Result<()> {
    let datasources = open(data_folder)?;

    match render(&datasources, name, id)? {
        Some(json) => {
            println!("{json}");
            Ok(())
        }
        None => {
            match id {
                Some(id) => eprintln!("No record with id '{id}' in datasource '{name}'"),
                None => eprintln!("No datasource named '{name}'"),
            }
            std::process::exit(1);
        }
    }
}
