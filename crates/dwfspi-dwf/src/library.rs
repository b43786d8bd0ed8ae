//! WaveForms runtime loading
//!
//! The runtime (`dwf.dll`, `libdwf.so`, `dwf.framework`) is opened with
//! `libloading` and every entry point the backend needs is resolved up
//! front, so a missing symbol is reported before any device is touched.

use std::ffi::{c_char, c_double, c_int, c_uchar, c_uint, CStr};

use libloading::{Library, Symbol};

use crate::error::{DwfError, Result};

/// Device handle (`HDWF`)
pub type Hdwf = c_int;

/// Handle value meaning "no device"
pub const HDWF_NONE: Hdwf = 0;

/// Open the first available device
pub const FIRST_DEVICE: c_int = -1;

/// C `BOOL` as returned by every runtime call
type Bool = c_int;

/// Size of the buffer filled by `FDwfGetLastErrorMsg`
const ERROR_MSG_LEN: usize = 512;

/// Size of the buffer filled by `FDwfGetVersion`
const VERSION_LEN: usize = 32;

/// Default runtime location for this platform
#[cfg(target_os = "windows")]
pub const DEFAULT_LIBRARY: &str = "dwf.dll";
/// Default runtime location for this platform
#[cfg(target_os = "macos")]
pub const DEFAULT_LIBRARY: &str = "/Library/Frameworks/dwf.framework/dwf";
/// Default runtime location for this platform
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const DEFAULT_LIBRARY: &str = "libdwf.so";

/// Resolved runtime entry points
pub(crate) struct Api {
    pub get_last_error_msg: unsafe extern "C" fn(*mut c_char) -> Bool,
    pub get_version: unsafe extern "C" fn(*mut c_char) -> Bool,
    pub device_open: unsafe extern "C" fn(c_int, *mut Hdwf) -> Bool,
    pub device_config_open: unsafe extern "C" fn(c_int, c_int, *mut Hdwf) -> Bool,
    pub device_close: unsafe extern "C" fn(Hdwf) -> Bool,
    pub device_auto_configure_set: unsafe extern "C" fn(Hdwf, c_int) -> Bool,
    pub spi_frequency_set: unsafe extern "C" fn(Hdwf, c_double) -> Bool,
    pub spi_clock_set: unsafe extern "C" fn(Hdwf, c_int) -> Bool,
    pub spi_data_set: unsafe extern "C" fn(Hdwf, c_int, c_int) -> Bool,
    pub spi_idle_set: unsafe extern "C" fn(Hdwf, c_int, c_int) -> Bool,
    pub spi_mode_set: unsafe extern "C" fn(Hdwf, c_int) -> Bool,
    pub spi_order_set: unsafe extern "C" fn(Hdwf, c_int) -> Bool,
    pub spi_select_set: unsafe extern "C" fn(Hdwf, c_int, c_int) -> Bool,
    pub spi_select: unsafe extern "C" fn(Hdwf, c_int, c_int) -> Bool,
    pub spi_write_one: unsafe extern "C" fn(Hdwf, c_int, c_int, c_uint) -> Bool,
    pub spi_read_one: unsafe extern "C" fn(Hdwf, c_int, c_int, *mut c_uint) -> Bool,
    pub spi_write_read: unsafe extern "C" fn(
        Hdwf,
        c_int,
        c_int,
        *const c_uchar,
        c_int,
        *mut c_uchar,
        c_int,
    ) -> Bool,
    pub digital_in_trigger_set: unsafe extern "C" fn(Hdwf, c_uint, c_uint, c_uint, c_uint) -> Bool,
}

/// Resolve one symbol and copy out the function pointer
///
/// # Safety
///
/// `T` must match the C signature of `name`.
unsafe fn symbol<T: Copy + 'static>(lib: &Library, name: &'static str) -> Result<T> {
    let sym: Symbol<'_, T> = lib
        .get(name.as_bytes())
        .map_err(|source| DwfError::MissingSymbol { name, source })?;
    Ok(*sym)
}

impl Api {
    /// # Safety
    ///
    /// `lib` must be the WaveForms runtime.
    unsafe fn resolve(lib: &Library) -> Result<Self> {
        Ok(Self {
            get_last_error_msg: symbol(lib, "FDwfGetLastErrorMsg")?,
            get_version: symbol(lib, "FDwfGetVersion")?,
            device_open: symbol(lib, "FDwfDeviceOpen")?,
            device_config_open: symbol(lib, "FDwfDeviceConfigOpen")?,
            device_close: symbol(lib, "FDwfDeviceClose")?,
            device_auto_configure_set: symbol(lib, "FDwfDeviceAutoConfigureSet")?,
            spi_frequency_set: symbol(lib, "FDwfDigitalSpiFrequencySet")?,
            spi_clock_set: symbol(lib, "FDwfDigitalSpiClockSet")?,
            spi_data_set: symbol(lib, "FDwfDigitalSpiDataSet")?,
            spi_idle_set: symbol(lib, "FDwfDigitalSpiIdleSet")?,
            spi_mode_set: symbol(lib, "FDwfDigitalSpiModeSet")?,
            spi_order_set: symbol(lib, "FDwfDigitalSpiOrderSet")?,
            spi_select_set: symbol(lib, "FDwfDigitalSpiSelectSet")?,
            spi_select: symbol(lib, "FDwfDigitalSpiSelect")?,
            spi_write_one: symbol(lib, "FDwfDigitalSpiWriteOne")?,
            spi_read_one: symbol(lib, "FDwfDigitalSpiReadOne")?,
            spi_write_read: symbol(lib, "FDwfDigitalSpiWriteRead")?,
            digital_in_trigger_set: symbol(lib, "FDwfDigitalInTriggerSet")?,
        })
    }
}

/// Loaded WaveForms runtime
pub struct DwfLibrary {
    pub(crate) api: Api,
    path: String,
    // Keeps the resolved function pointers valid
    _lib: Library,
}

impl DwfLibrary {
    /// Load the runtime from `path`
    ///
    /// A bare file name is looked up through the platform's library search
    /// path.
    pub fn load(path: &str) -> Result<Self> {
        log::debug!("dwf: Loading runtime from {}", path);

        // SAFETY: loading the vendor runtime runs its initializers; there is
        // no way to check them from here.
        let lib = unsafe { Library::new(path) }.map_err(|source| DwfError::LoadFailed {
            path: path.to_string(),
            source,
        })?;

        // SAFETY: the signatures in `Api` follow the runtime's C header.
        let api = unsafe { Api::resolve(&lib)? };

        Ok(Self {
            api,
            path: path.to_string(),
            _lib: lib,
        })
    }

    /// Path the runtime was loaded from
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Runtime version string
    pub fn version(&self) -> Option<String> {
        let mut buf = [0u8; VERSION_LEN];
        // SAFETY: the runtime writes at most VERSION_LEN bytes
        let ok = unsafe { (self.api.get_version)(buf.as_mut_ptr().cast()) };
        (ok != 0).then(|| c_buf_to_string(&buf))
    }

    /// Last error message reported by the runtime
    pub fn last_error(&self) -> String {
        let mut buf = [0u8; ERROR_MSG_LEN];
        // SAFETY: the runtime writes at most ERROR_MSG_LEN bytes
        unsafe { (self.api.get_last_error_msg)(buf.as_mut_ptr().cast()) };
        c_buf_to_string(&buf)
    }

    /// Open a device and return its raw handle
    ///
    /// `config` selects `FDwfDeviceConfigOpen` instead of `FDwfDeviceOpen`.
    pub(crate) fn open_handle(&self, device: c_int, config: Option<c_int>) -> Result<Hdwf> {
        let mut hdwf: Hdwf = HDWF_NONE;

        // SAFETY: `hdwf` outlives the call
        let ok = unsafe {
            match config {
                Some(cfg) => (self.api.device_config_open)(device, cfg, &mut hdwf),
                None => (self.api.device_open)(device, &mut hdwf),
            }
        };

        if ok == 0 || hdwf == HDWF_NONE {
            let message = self.last_error();
            return Err(DwfError::OpenFailed(if message.is_empty() {
                "no device found".to_string()
            } else {
                message
            }));
        }

        Ok(hdwf)
    }
}

/// Convert a NUL-terminated C buffer into a trimmed `String`
pub(crate) fn c_buf_to_string(buf: &[u8]) -> String {
    let text = match CStr::from_bytes_until_nul(buf) {
        Ok(s) => s.to_string_lossy().into_owned(),
        Err(_) => String::from_utf8_lossy(buf).into_owned(),
    };
    text.trim_end().to_string()
}
