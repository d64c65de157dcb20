//! 데이터 수집 및 조인 모듈.

pub mod missing_dates;
pub mod per_pbr_features;
pub mod price_collect;
pub mod roster_download;
pub mod roster_join;

pub use missing_dates::report_missing_dates;
pub use per_pbr_features::build_features;
pub use price_collect::collect_prices;
pub use roster_download::download_roster;
pub use roster_join::join_roster;
