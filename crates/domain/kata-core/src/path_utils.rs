use camino::Utf8Path;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("{path} is not inside workspace {root}")]
    NotUnderRoot { path: String, root: String },
    #[error("{path} must be at least <language>/<exercise>/<file> below the workspace root")]
    TooShallow { path: String },
}

/// Exercise identity recovered from where a file sits in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedPath {
    pub file_name: String,
    pub exercise: String,
    pub language: String,
}

pub struct ExercisePath;

impl ExercisePath {
    /// Split `file_path` below `root` into `<language>/<exercise>/.../<file>`.
    ///
    /// Purely positional: nothing checks that the language or exercise exist.
    /// Files nested deeper than the exercise directory keep the first two
    /// segments as identity and the last one as the file name.
    pub fn extract(file_path: &str, root: &str, separator: char) -> Result<ExtractedPath, PathError> {
        let not_under_root = || PathError::NotUnderRoot {
            path: file_path.to_string(),
            root: root.to_string(),
        };

        let rest = file_path.strip_prefix(root).ok_or_else(not_under_root)?;
        // `/ws` must not claim `/wsx/...`.
        if !rest.is_empty() && !rest.starts_with(separator) && !root.ends_with(separator) {
            return Err(not_under_root());
        }

        let segments: Vec<&str> = rest.split(separator).filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [language, exercise, .., file_name] => Ok(ExtractedPath {
                file_name: (*file_name).to_string(),
                exercise: (*exercise).to_string(),
                language: (*language).to_string(),
            }),
            _ => Err(PathError::TooShallow {
                path: file_path.to_string(),
            }),
        }
    }

    /// [`ExercisePath::extract`] with the platform separator.
    pub fn extract_native(file_path: &Utf8Path, root: &Utf8Path) -> Result<ExtractedPath, PathError> {
        Self::extract(
            file_path.as_str(),
            root.as_str(),
            std::path::MAIN_SEPARATOR,
        )
    }

    /// A single relative component or relative path that cannot escape its parent.
    pub fn verify_safe(rel_path: &str) -> bool {
        let p = std::path::Path::new(rel_path);
        !rel_path.is_empty()
            && !p.is_absolute()
            && !rel_path.starts_with(['/', '\\'])
            && !rel_path.split(['/', '\\']).any(|seg| seg == "..")
            && p.components().all(|c| matches!(c, std::path::Component::Normal(_)))
    }
}
