//! Clean command - remove cached dependencies

use crate::cli::args::ProjectArgs;
use crate::cli::commands::ProjectLocation;
use crate::config::Config;
use crate::error::CartonResult;
use crate::interactor;
use crate::ui::{self, UiContext};

/// Execute the clean command
pub async fn execute(args: ProjectArgs, config: &Config) -> CartonResult<()> {
    let ctx = UiContext::detect();
    let location = ProjectLocation::resolve(&args, config)?;

    interactor::clean(&location.cache_root).await?;

    ui::step_ok(
        &ctx,
        &format!("Cleaned {}", location.cache_root.display()),
    );
    Ok(())
}
