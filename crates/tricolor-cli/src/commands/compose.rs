use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tricolor_core::io::image_io::ImageKind;
use tricolor_core::io::npy::save_composite_npy;
use tricolor_core::io::present::{DisplayRequest, FilePresenter, Presenter};
use tricolor_core::pipeline::compose_reported;

use super::CompositeArgs;
use crate::progress::BarReporter;
use crate::summary::{print_compose_summary, print_outputs, print_report};

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// 8-bit RGB PNG
    Png,
    /// 16-bit RGB TIFF
    Tiff,
}

impl From<FormatArg> for ImageKind {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => ImageKind::Png,
            FormatArg::Tiff => ImageKind::Tiff,
        }
    }
}

#[derive(Args)]
pub struct ComposeArgs {
    #[command(flatten)]
    pub composite: CompositeArgs,

    /// Directory for the composite outputs
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Image format of the rendered composite
    #[arg(long, value_enum, default_value = "png")]
    pub format: FormatArg,

    /// Skip writing <object>_img_array.npy
    #[arg(long)]
    pub no_array: bool,
}

pub fn run(args: &ComposeArgs) -> Result<()> {
    let object = &args.composite.object;
    let config = args.composite.load_config()?;
    let loaded = args.composite.loader()?.load(object)?;

    print_compose_summary(object, &loaded.paths, &config);

    let reporter = BarReporter::new()?;
    let composite = compose_reported(&loaded.channels, &config, &reporter)
        .with_context(|| format!("Failed to build composite of {object}"))?;
    reporter.finish();

    print_report(&composite.report);

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("Failed to create output directory {}", args.output_dir.display())
    })?;

    let mut saved = Vec::new();
    if !args.no_array {
        let path = args.output_dir.join(format!("{object}_img_array.npy"));
        save_composite_npy(&composite.image, &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        saved.push(path);
    }

    let presenter = FilePresenter::new(&args.output_dir, args.format.into());
    let request = DisplayRequest::new(object, &composite.image);
    presenter
        .present(&request)
        .context("Failed to write composite image")?;
    saved.push(presenter.output_path(&request));

    let paths: Vec<_> = saved.iter().map(PathBuf::as_path).collect();
    print_outputs(&paths);

    Ok(())
}
