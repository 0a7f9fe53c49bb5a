pub mod bump_version;
pub mod campaign;
pub mod demog;
pub mod sweep;
pub mod version;
