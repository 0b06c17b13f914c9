pub mod migrate;
pub mod resample;
pub mod web;

pub use migrate::handle_migrate;
pub use resample::handle_resample;
pub use web::handle_web;
