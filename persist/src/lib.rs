//! Values saved as json files in a temporary directory, keyed by a kind name and the title of the
//! window they belong to.

use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    path::PathBuf,
};

fn sounder_tmp_dir() -> PathBuf {
    std::env::temp_dir().join("sounder")
}

fn containing_dir(name: &str) -> PathBuf {
    sounder_tmp_dir().join(name)
}

/// The title is hexxed so the file name contains no characters with meaning in a path. A
/// readable prefix of the title is kept in front to make the directory easier to browse.
fn file_name(title: &str) -> String {
    let prefix = title
        .chars()
        .take_while(|&c| {
            c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == ' '
        })
        .map(|c| if c == ' ' { '-' } else { c })
        .collect::<String>();
    format!("{}-{}.json", prefix, hex::encode(title))
}

fn file_path(name: &str, title: &str) -> PathBuf {
    containing_dir(name).join(file_name(title))
}

/// Implement this for types which are saved in a directory of their own.
pub trait PersistData: Serialize + for<'a> Deserialize<'a> {
    const NAME: &'static str;

    fn save(&self, title: impl AsRef<str>) -> anyhow::Result<()> {
        use std::io::Write;
        fs::create_dir_all(containing_dir(Self::NAME))?;
        let json_string = serde_json::to_string(self)?;
        let mut file = File::create(file_path(Self::NAME, title.as_ref()))?;
        write!(file, "{}", json_string)?;
        Ok(())
    }

    /// Like `save` but logs a warning on failure rather than returning an error value.
    fn save_(&self, title: impl AsRef<str>) {
        if let Err(e) = self.save(&title) {
            log::warn!(
                "Failed to save {} for {}: {}",
                Self::NAME,
                title.as_ref(),
                e
            );
        }
    }

    fn load(title: impl AsRef<str>) -> anyhow::Result<Self> {
        let json_string =
            fs::read_to_string(file_path(Self::NAME, title.as_ref()))?;
        let t = serde_json::from_str(json_string.as_str())?;
        Ok(t)
    }

    /// Like `load` but logs at debug level and returns `None` on failure. A value that was
    /// never saved is the common case on first run.
    fn load_(title: impl AsRef<str>) -> Option<Self> {
        match Self::load(&title) {
            Ok(t) => Some(t),
            Err(e) => {
                log::debug!(
                    "Failed to load {} for {}: {}",
                    Self::NAME,
                    title.as_ref(),
                    e
                );
                None
            }
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

impl PersistData for WindowPosition {
    const NAME: &'static str = "window_position";
}
