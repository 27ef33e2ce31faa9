pub mod extracted;
pub mod gpu;
pub mod listing;

pub use extracted::{Extracted, MissKind};
pub use gpu::{Brand, GpuCanonicalRecord, NormalizedAttributes, SoldListing};
pub use listing::{
    image_filename_from_url, AxisKind, ListingPage, RawListing, RawProductDetail, VariationAxis,
    VariationOption,
};
