//! Page objects of the configuration views

pub mod batch;
pub mod scattered_cache;

pub use batch::BatchPage;
pub use scattered_cache::ScatteredCachePage;
