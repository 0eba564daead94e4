use std::path::PathBuf;

use tracing::info;

use crate::channel::CompositeImage;
use crate::error::Result;

use super::image_io::{save_composite_png, save_composite_tiff, ImageKind};

/// A finished composite ready to be shown, titled with the object name.
#[derive(Clone, Copy, Debug)]
pub struct DisplayRequest<'a> {
    pub title: &'a str,
    pub image: &'a CompositeImage,
}

impl<'a> DisplayRequest<'a> {
    pub fn new(title: &'a str, image: &'a CompositeImage) -> Self {
        Self { title, image }
    }
}

/// Renders or persists a composite. Rendering itself lives outside the core.
///
/// Implementations decide what to do with `title`: a windowed viewer would
/// draw it as the figure caption.
pub trait Presenter {
    fn present(&self, request: &DisplayRequest<'_>) -> Result<()>;
}

/// Presenter that writes `<dir>/<title>.<ext>`.
///
/// The title only names the file; no caption is drawn into the pixels.
#[derive(Clone, Debug)]
pub struct FilePresenter {
    pub dir: PathBuf,
    pub kind: ImageKind,
}

impl FilePresenter {
    pub fn new(dir: impl Into<PathBuf>, kind: ImageKind) -> Self {
        Self {
            dir: dir.into(),
            kind,
        }
    }

    /// Path the request will be written to.
    pub fn output_path(&self, request: &DisplayRequest<'_>) -> PathBuf {
        self.dir
            .join(format!("{}.{}", request.title, self.kind.extension()))
    }
}

impl Presenter for FilePresenter {
    fn present(&self, request: &DisplayRequest<'_>) -> Result<()> {
        let path = self.output_path(request);
        match self.kind {
            ImageKind::Png => save_composite_png(request.image, &path)?,
            ImageKind::Tiff => save_composite_tiff(request.image, &path)?,
        }
        info!(title = request.title, path = %path.display(), "Composite written");
        Ok(())
    }
}
