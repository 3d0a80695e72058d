use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "chatbot_data.bin";

pub struct ChatConfig {
    /// Local bundle path used when the form field is left empty
    pub data_path: PathBuf,
    /// Where to fetch the bundle from when the local file is missing
    pub source_url: Option<String>,
    /// Directory that holds bundles fetched from a URL typed into the form
    pub cache_dir: PathBuf,
    pub top_k: usize,
    pub delimiter: char,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            source_url: None,
            cache_dir: default_cache_dir(),
            top_k: 3,
            delimiter: ';',
        }
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("sentence-qa")
}
