// Radio driver framework
pub mod registry;
pub mod traits;

// Drivers
pub mod at878uv;

pub use registry::{get_driver, list_drivers, register_driver, DriverInfo};
pub use traits::{CloneModeRadio, Radio, RadioError, RadioResult, Status, StatusCallback};

/// Initialize and register all available radio drivers
///
/// This function must be called once at application startup to populate
/// the driver registry with all available radio drivers.
pub fn init_drivers() {
    register_driver(DriverInfo::new(
        "AnyTone",
        "AT-D878UV",
        "Dual-band DMR/FM handheld (VHF/UHF)",
        at878uv::USB_VENDOR_ID,
        at878uv::USB_PRODUCT_ID,
        true, // is_clone_mode
    ));
}
