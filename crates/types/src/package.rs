//! Package metadata exported to downstream consumers

use crate::recipe::Options;
use crate::settings::Os;
use serde::{Deserialize, Serialize};

/// Linkable libraries and preprocessor defines the package exposes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    /// Library names in link order: base, high-level API, optional C++
    pub libs: Vec<String>,
    /// Platform-specific defines downstream compilations need
    pub defines: Vec<String>,
}

impl PackageInfo {
    /// Derive the exported metadata from the recipe options and target OS
    #[must_use]
    pub fn new(options: Options, os: Os) -> Self {
        let mut libs = vec!["hdf5".to_string(), "hdf5_hl".to_string()];
        if options.cxx {
            libs.push("hdf5_cpp".to_string());
        }

        let defines = if os.is_windows() {
            vec!["H5_BUILT_AS_DYNAMIC_LIB".to_string()]
        } else {
            Vec::new()
        };

        Self { libs, defines }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cxx_adds_bindings_library_once() {
        let with_cxx = PackageInfo::new(
            Options {
                cxx: true,
                shared: true,
                parallel: false,
            },
            Os::Linux,
        );
        assert_eq!(with_cxx.libs, vec!["hdf5", "hdf5_hl", "hdf5_cpp"]);
        assert_eq!(
            with_cxx.libs.iter().filter(|l| *l == "hdf5_cpp").count(),
            1
        );

        let without_cxx = PackageInfo::new(
            Options {
                cxx: false,
                shared: true,
                parallel: false,
            },
            Os::Linux,
        );
        assert_eq!(without_cxx.libs, vec!["hdf5", "hdf5_hl"]);
    }

    #[test]
    fn windows_exports_dynamic_lib_define() {
        let info = PackageInfo::new(Options::default(), Os::Windows);
        assert_eq!(info.defines, vec!["H5_BUILT_AS_DYNAMIC_LIB"]);

        let info = PackageInfo::new(Options::default(), Os::Linux);
        assert!(info.defines.is_empty());
    }
}
