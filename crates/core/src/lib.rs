//! Vaulto core: config workspace, the [`MarketData`] facade and the shared
//! caches the CLI and the backend build on.

pub mod geo;
pub mod logo;
pub mod market;
pub mod workspace;

pub use geo::GeoClient;
pub use logo::{LogoCache, LogoSource};
pub use market::MarketData;
pub use workspace::{init_workspace, load_app_config};
