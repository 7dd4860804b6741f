//! Business logic services for voxprobe-vd

pub mod classifier;
pub mod pipeline;
pub mod readiness;

pub use classifier::{Classifier, ClassifierParams};
pub use pipeline::{DetectionPipeline, PipelineError};
pub use readiness::{spawn_readiness_probe, warm_up, Readiness, WarmupError, WarmupReport};
