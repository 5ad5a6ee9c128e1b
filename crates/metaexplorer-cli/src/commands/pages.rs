//! Pages command - Write the landing pages, stylesheet and browser client

use anyhow::{Context, Result};
use clap::Args;
use metaexplorer_backend::Refresher;

use super::{load_config, print_info, select_versions, working_dir};
use crate::progress::{finish_spinner, spinner};
use crate::GlobalOptions;

/// Arguments for the pages command
#[derive(Args, Debug)]
pub struct PagesArgs {
    /// Only list these versions in the navigation (repeatable; default: all)
    #[arg(long = "version", value_name = "VERSION")]
    versions: Vec<String>,
}

/// Execute the pages command
pub async fn execute(args: PagesArgs, global: GlobalOptions) -> Result<()> {
    let config = load_config(&global)?;
    let root = working_dir()?;
    let versions = select_versions(&config, &args.versions)?;

    let refresher =
        Refresher::from_config(&config, &root).context("Failed to set up the refresher")?;

    let pb = spinner("Publishing pages...", global.quiet);
    let written = refresher
        .publish_pages(&config.pages.title, &versions)
        .await
        .context("Failed to publish pages")?;
    finish_spinner(pb, &format!("Published {} artifacts", written.len()));

    let output_dir = config.output_dir(&root);
    for name in &written {
        print_info(
            &format!("  {}", output_dir.join(name).display()),
            global.quiet,
        );
    }

    Ok(())
}
