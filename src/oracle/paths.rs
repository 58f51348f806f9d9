use serde::Deserialize;

/// Where the component library and the UI framework live on disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LibraryLayout {
    /// Package-manager install directory name.
    pub package_dir: String,
    /// Package name of the component library.
    pub library: String,
    /// Build output folders under the library package that hold one
    /// folder per component.
    pub build_dirs: Vec<String>,
    /// Packages whose declarations mean "this is the UI framework".
    pub framework_packages: Vec<String>,
}

impl Default for LibraryLayout {
    fn default() -> Self {
        Self {
            package_dir: "node_modules".to_string(),
            library: "antd".to_string(),
            build_dirs: vec!["lib".to_string(), "es".to_string()],
            framework_packages: vec!["@types/react".to_string(), "react".to_string()],
        }
    }
}

/// The component folder and file a library-owned path points into.
///
/// `/p/node_modules/antd/lib/date-picker/interface.d.ts` gives folder
/// `date-picker` and file `interface.d.ts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryModule {
    pub folder: String,
    pub file: String,
}

impl LibraryLayout {
    /// Match `.../<package_dir>/<library>/<build>/<folder>/<file>`.
    ///
    /// Nested folders stay in `folder`; the last segment is `file`.
    pub fn library_module(&self, path: &str) -> Option<LibraryModule> {
        let path = path.replace('\\', "/");
        for build in &self.build_dirs {
            let marker = format!("/{}/{}/{}/", self.package_dir, self.library, build);
            let Some(idx) = path.rfind(&marker) else {
                continue;
            };
            let rest = &path[idx + marker.len()..];
            let Some((folder, file)) = rest.rsplit_once('/') else {
                continue;
            };
            if folder.is_empty() || file.is_empty() {
                continue;
            }
            return Some(LibraryModule {
                folder: folder.to_string(),
                file: file.to_string(),
            });
        }
        None
    }

    pub fn is_library_owned(&self, path: &str) -> bool {
        self.library_module(path).is_some()
    }

    /// Outside every installed dependency.
    pub fn is_user_owned(&self, path: &str) -> bool {
        let marker = format!("/{}/", self.package_dir);
        !path.replace('\\', "/").contains(&marker)
    }

    pub fn is_framework_owned(&self, path: &str) -> bool {
        let path = path.replace('\\', "/");
        self.framework_packages.iter().any(|pkg| {
            let marker = format!("/{}/{}/", self.package_dir, pkg);
            path.contains(&marker)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_module_extracts_folder_and_file() {
        let layout = LibraryLayout::default();
        let m = layout
            .library_module("/p/node_modules/antd/lib/date-picker/interface.d.ts")
            .unwrap();
        assert_eq!(m.folder, "date-picker");
        assert_eq!(m.file, "interface.d.ts");

        let m = layout
            .library_module("/p/node_modules/antd/es/table/hooks/useSelection.d.ts")
            .unwrap();
        assert_eq!(m.folder, "table/hooks");
    }

    #[test]
    fn library_module_rejects_other_paths() {
        let layout = LibraryLayout::default();
        assert!(layout.library_module("/p/node_modules/antd/lib/index.d.ts").is_none());
        assert!(layout.library_module("/p/node_modules/rc-tree/lib/Tree.d.ts").is_none());
        assert!(layout.library_module("/p/src/antd/lib/button/index.tsx").is_none());
    }

    #[test]
    fn ownership_partitions() {
        let layout = LibraryLayout::default();
        let user = "/p/src/App.tsx";
        let lib = "/p/node_modules/antd/lib/affix/index.d.ts";
        let other = "/p/node_modules/rc-tree/lib/Tree.d.ts";

        assert!(layout.is_user_owned(user));
        assert!(!layout.is_library_owned(user));
        assert!(layout.is_library_owned(lib));
        assert!(!layout.is_user_owned(lib));
        assert!(!layout.is_user_owned(other));
        assert!(!layout.is_library_owned(other));
    }

    #[test]
    fn framework_paths() {
        let layout = LibraryLayout::default();
        assert!(layout.is_framework_owned("/p/node_modules/@types/react/index.d.ts"));
        assert!(layout.is_framework_owned("C:\\p\\node_modules\\react\\index.js"));
        assert!(!layout.is_framework_owned("/p/node_modules/react-dom/index.d.ts"));
    }
}
