//! Static catalog of restoration models offered to submitters.

use serde::{Deserialize, Serialize};

/// Speed/quality trade-off class of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Speed,
    Quality,
    Balanced,
}

/// Catalog entry describing one restoration model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ModelKind,
    pub tags: &'static [&'static str],
}

/// The models the dashboard offers. Ids double as the `model_id` values
/// accepted on jobs.
pub fn model_catalog() -> &'static [ModelInfo] {
    &[
        ModelInfo {
            id: "wiener_deconvolution_v1",
            name: "Wiener Deconvolution",
            description: "Classical signal processing approach. Best for uniform motion blur.",
            kind: ModelKind::Speed,
            tags: &["Classical", "Fast"],
        },
        ModelInfo {
            id: "swinir_restoration",
            name: "SwinIR",
            description: "Transformer-based restoration. Superior quality for diverse degradations.",
            kind: ModelKind::Quality,
            tags: &["Transformer", "SOTA"],
        },
        ModelInfo {
            id: "real_esrgan_v2",
            name: "Real-ESRGAN",
            description: "Blind super-resolution. Excellent for restoring fine textures and details.",
            kind: ModelKind::Quality,
            tags: &["GAN", "Super-Res"],
        },
        ModelInfo {
            id: "optical_diffusion_beta",
            name: "Optical Diffusion",
            description: "Generative diffusion model. Restores images with physical consistency.",
            kind: ModelKind::Balanced,
            tags: &["Diffusion", "Experimental"],
        },
    ]
}

/// Look up a catalog entry by id.
pub fn find_model(id: &str) -> Option<&'static ModelInfo> {
    model_catalog().iter().find(|m| m.id == id)
}
