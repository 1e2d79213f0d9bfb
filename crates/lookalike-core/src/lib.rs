//! Unicode confusable detection and normalization per UTS #39.
//!
//! Every operation takes an explicit [`Dataset`]; [`bundled`] returns the
//! snapshot compiled into the crate.

pub mod compare;
pub mod config;
pub mod dataset;
pub mod error;
pub mod lookup;
pub mod metadata;
pub mod normalize;
pub mod random;
pub mod record;
pub mod variations;

pub use compare::are_confusable;
pub use dataset::{bundled, Dataset, DatasetDocument};
pub use error::{DatasetError, VariationError};
pub use metadata::Metadata;
pub use normalize::{normalize, normalize_all};
pub use random::{RandomOptions, Randomizer};
pub use record::{Classification, ConfusableRecord};
pub use variations::{generate_variations, Variations};
