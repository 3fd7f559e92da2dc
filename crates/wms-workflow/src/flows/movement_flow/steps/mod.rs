pub mod enter_quantity_step50;
pub mod scan_article_step20;
pub mod scan_feature_step40;
pub mod scan_final_location_step70;
pub mod select_content_step30;
pub mod select_movement_step10;
pub mod validate_step80;

pub use enter_quantity_step50::EnterQuantityStep50;
pub use scan_article_step20::ScanArticleStep20;
pub use scan_feature_step40::ScanFeatureStep40;
pub use scan_final_location_step70::ScanFinalLocationStep70;
pub use select_content_step30::SelectContentStep30;
pub use select_movement_step10::SelectMovementStep10;
pub use validate_step80::ValidateStep80;
