use serde::Serialize;

/// A pinned H5P library dependency. The manifest entry and the copied asset
/// folder must agree on these versions exactly or the archive is unusable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryRef {
    pub machine_name: &'static str,
    pub major_version: u32,
    pub minor_version: u32,
}

impl LibraryRef {
    pub const MULTI_CHOICE: LibraryRef = LibraryRef::new("H5P.MultiChoice", 1, 16);
    pub const TRUE_FALSE: LibraryRef = LibraryRef::new("H5P.TrueFalse", 1, 8);
    pub const BLANKS: LibraryRef = LibraryRef::new("H5P.Blanks", 1, 14);
    pub const ADVANCED_TEXT: LibraryRef = LibraryRef::new("H5P.AdvancedText", 1, 1);
    pub const QUESTION: LibraryRef = LibraryRef::new("H5P.Question", 1, 5);
    pub const JOUBEL_UI: LibraryRef = LibraryRef::new("H5P.JoubelUI", 1, 3);
    pub const TRANSITION: LibraryRef = LibraryRef::new("H5P.Transition", 1, 0);
    pub const FONT_ICONS: LibraryRef = LibraryRef::new("H5P.FontIcons", 1, 0);

    pub const fn new(machine_name: &'static str, major_version: u32, minor_version: u32) -> Self {
        Self {
            machine_name,
            major_version,
            minor_version,
        }
    }

    /// Shared runtime libraries the question libraries depend on.
    pub fn support_libraries() -> [LibraryRef; 4] {
        [
            LibraryRef::QUESTION,
            LibraryRef::JOUBEL_UI,
            LibraryRef::TRANSITION,
            LibraryRef::FONT_ICONS,
        ]
    }

    /// Asset folder name, `<MachineName>-<major>.<minor>`.
    pub fn folder_name(&self) -> String {
        format!(
            "{}-{}.{}",
            self.machine_name, self.major_version, self.minor_version
        )
    }
}

impl std::fmt::Display for LibraryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}.{}",
            self.machine_name, self.major_version, self.minor_version
        )
    }
}
