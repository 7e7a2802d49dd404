//! Restoration model seam.
//!
//! The actual restoration algorithms (Wiener deconvolution, GAN and diffusion
//! models) run in an external inference engine that is not part of this
//! repository. The worker only needs the [`Restorer`] trait; in this crate
//! every catalog model resolves to a [`PassthroughRestorer`] that returns its
//! input unchanged, which keeps the job pipeline and its bookkeeping fully
//! exercisable.

use image::RgbaImage;

use crate::error::RestoreError;
use crate::job::{find_model, RestorationParameters};

/// A restoration model the worker can run an image (or a tile) through.
///
/// Implementations must preserve dimensions: the output image has the same
/// width and height as the input.
pub trait Restorer: Send + Sync {
    /// Catalog id of the model, recorded on benchmarks.
    fn name(&self) -> &str;

    /// Restore one image. Tiled invocations pass each tile's content here
    /// independently.
    fn restore(
        &self,
        input: &RgbaImage,
        parameters: Option<&RestorationParameters>,
    ) -> Result<RgbaImage, RestoreError>;
}

/// Stand-in for the external inference engine: returns the input unchanged.
pub struct PassthroughRestorer {
    model_id: String,
}

impl PassthroughRestorer {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
        }
    }
}

impl Restorer for PassthroughRestorer {
    fn name(&self) -> &str {
        &self.model_id
    }

    fn restore(
        &self,
        input: &RgbaImage,
        _parameters: Option<&RestorationParameters>,
    ) -> Result<RgbaImage, RestoreError> {
        Ok(input.clone())
    }
}

/// Resolve a job's `model_id` to a restorer.
///
/// Only ids present in the model catalog resolve; anything else is an
/// [`RestoreError::UnknownModel`], which fails the job before any pixel work.
pub fn resolve_restorer(model_id: &str) -> Result<Box<dyn Restorer>, RestoreError> {
    let model =
        find_model(model_id).ok_or_else(|| RestoreError::UnknownModel(model_id.to_string()))?;
    Ok(Box::new(PassthroughRestorer::new(model.id)))
}
