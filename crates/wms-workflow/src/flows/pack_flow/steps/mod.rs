pub mod scan_box_step10;
pub mod scan_pallet_step20;
pub mod select_hu_model_step30;
pub mod validate_step40;

pub use scan_box_step10::ScanBoxStep10;
pub use scan_pallet_step20::ScanPalletStep20;
pub use select_hu_model_step30::SelectHuModelStep30;
pub use validate_step40::ValidateStep40;
