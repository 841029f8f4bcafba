use tracing::debug;

use crate::model::{Catalog, CatalogEntry};

#[cfg(target_os = "windows")]
const CURRENT_VERSION_SUBKEY: &str = r"SOFTWARE\Microsoft\Windows NT\CurrentVersion";

/// Identifies the host the catalog is filtered for. `build` is the OS build
/// number (e.g. 22631); `None` means it could not be determined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentDescriptor {
    pub windows_version: Option<String>,
    pub build: Option<u32>,
}

impl EnvironmentDescriptor {
    pub fn with_build(build: u32) -> Self {
        Self {
            windows_version: None,
            build: Some(build),
        }
    }

    pub fn unknown() -> Self {
        Self::default()
    }

    #[cfg(target_os = "windows")]
    pub fn detect() -> Self {
        let build = read_current_version_string("CurrentBuildNumber")
            .and_then(|value| value.trim().parse::<u32>().ok());
        let windows_version = read_current_version_string("DisplayVersion")
            .or_else(|| read_current_version_string("ReleaseId"));
        Self {
            windows_version,
            build,
        }
    }

    #[cfg(not(target_os = "windows"))]
    pub fn detect() -> Self {
        Self::unknown()
    }

    /// Applies a configured build override on top of the detected values.
    pub fn with_build_override(mut self, build: Option<u32>) -> Self {
        if build.is_some() {
            self.build = build;
        }
        self
    }

    pub fn supports(&self, entry: &CatalogEntry) -> bool {
        let Some(build) = self.build else {
            return true;
        };

        if entry
            .introduced_in_build
            .is_some_and(|introduced| build < introduced)
        {
            return false;
        }

        if entry
            .deprecated_in_build
            .is_some_and(|deprecated| build >= deprecated)
        {
            return false;
        }

        true
    }
}

pub fn filter_catalog(mut catalog: Catalog, environment: &EnvironmentDescriptor) -> Catalog {
    let before = catalog.len();
    catalog.retain(|entry| environment.supports(entry));
    debug!(
        kind = catalog.kind.as_str(),
        build = ?environment.build,
        removed = before - catalog.len(),
        "environment filter applied"
    );
    catalog
}

#[cfg(target_os = "windows")]
fn read_current_version_string(value: &str) -> Option<String> {
    use windows_sys::Win32::Foundation::ERROR_SUCCESS;
    use windows_sys::Win32::System::Registry::{
        RegCloseKey, RegOpenKeyExW, RegQueryValueExW, HKEY_LOCAL_MACHINE, KEY_QUERY_VALUE, REG_SZ,
    };

    let subkey = to_wide(CURRENT_VERSION_SUBKEY);
    let value_name = to_wide(value);
    let mut key = std::ptr::null_mut();
    let status = unsafe {
        RegOpenKeyExW(
            HKEY_LOCAL_MACHINE,
            subkey.as_ptr(),
            0,
            KEY_QUERY_VALUE,
            &mut key,
        )
    };
    if status != ERROR_SUCCESS {
        return None;
    }

    let mut value_type = 0_u32;
    let mut size = 0_u32;
    let status = unsafe {
        RegQueryValueExW(
            key,
            value_name.as_ptr(),
            std::ptr::null(),
            &mut value_type,
            std::ptr::null_mut(),
            &mut size,
        )
    };
    if status != ERROR_SUCCESS || value_type != REG_SZ || size == 0 {
        unsafe {
            RegCloseKey(key);
        }
        return None;
    }

    let mut buffer = vec![0_u16; (size as usize).div_ceil(2)];
    let status = unsafe {
        RegQueryValueExW(
            key,
            value_name.as_ptr(),
            std::ptr::null(),
            &mut value_type,
            buffer.as_mut_ptr() as *mut u8,
            &mut size,
        )
    };
    unsafe {
        RegCloseKey(key);
    }
    if status != ERROR_SUCCESS {
        return None;
    }

    while buffer.last().copied() == Some(0) {
        buffer.pop();
    }
    Some(String::from_utf16_lossy(&buffer))
}

#[cfg(target_os = "windows")]
fn to_wide(value: &str) -> Vec<u16> {
    value.encode_utf16().chain(std::iter::once(0)).collect()
}
