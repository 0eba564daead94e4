use anyhow::{Context, Result};
use clap::Args;
use tricolor_core::pipeline::compose;

use super::CompositeArgs;
use crate::summary::{print_compose_summary, print_report};

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub composite: CompositeArgs,
}

/// Run the compositor and report its numbers without writing anything.
pub fn run(args: &InspectArgs) -> Result<()> {
    let object = &args.composite.object;
    let config = args.composite.load_config()?;
    let loaded = args.composite.loader()?.load(object)?;
    let (h, w) = loaded.channels.dim();

    print_compose_summary(object, &loaded.paths, &config);
    println!("  Dimensions:  {w}x{h}");

    let composite = compose(&loaded.channels, &config)
        .with_context(|| format!("Failed to build composite of {object}"))?;
    print_report(&composite.report);

    Ok(())
}
