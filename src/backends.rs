//! Backend selection and dispatch
//!
//! Backends are feature-gated; this module opens whichever one the command
//! line asks for and hands it back as a boxed `SpiBackend`.

use crate::cli::DeviceArgs;
use dwfspi_core::backend::SpiBackend;

/// Names of the backends enabled at compile time
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_backends() -> Vec<&'static str> {
    let mut backends = Vec::new();

    #[cfg(feature = "dwf")]
    backends.push("dwf");

    #[cfg(feature = "dummy")]
    backends.push("dummy");

    backends
}

/// Line printed before the device is opened
pub fn opening_message(args: &DeviceArgs) -> String {
    if args.dummy {
        "Opening dummy device".to_string()
    } else if args.device < 0 {
        "Opening first device".to_string()
    } else {
        format!("Opening device #{}", args.device)
    }
}

#[cfg(feature = "dwf")]
fn dwf_config(args: &DeviceArgs) -> dwfspi_dwf::DwfConfig {
    let mut config = dwfspi_dwf::DwfConfig::new()
        .with_device(args.device)
        .with_device_config(args.device_config);
    if let Some(path) = &args.library {
        config = config.with_library(path.clone());
    }
    config
}

/// Open the backend selected by `args`
#[allow(unreachable_code, unused_variables)]
pub fn open_backend(
    args: &DeviceArgs,
) -> Result<Box<dyn SpiBackend>, Box<dyn std::error::Error>> {
    if args.dummy {
        #[cfg(feature = "dummy")]
        {
            log::info!("Using dummy loopback device");
            return Ok(Box::new(dwfspi_dummy::DummyDevice::new_default()));
        }
        return Err("dummy backend not available (recompile with the dummy feature)".into());
    }

    #[cfg(feature = "dwf")]
    {
        return dwfspi_dwf::open_dwf(&dwf_config(args));
    }

    let names = available_backends();
    Err(format!(
        "No hardware backend available (compiled backends: {})",
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(", ")
        }
    )
    .into())
}
