pub mod batch;
pub mod ext;
pub mod pairwise;
pub mod partial;
pub mod skip_erroneous;
#[cfg(feature = "std")]
pub mod unique;
pub mod unzip;
pub mod window;
