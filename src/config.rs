use std::path::PathBuf;

/// Application configuration from environment variables (with an optional
/// CLI override for the data directory).
pub struct Config {
    pub data_dir: PathBuf,
    pub api_key: Option<String>,
    pub text_model: String,
    pub image_model: String,
}

const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

impl Config {
    pub fn from_env(data_dir_override: Option<PathBuf>) -> Self {
        let mut config = Self::from_raw_values(
            std::env::var("PRDFORGE_DATA_DIR").ok().as_deref(),
            std::env::var("GEMINI_API_KEY").ok().as_deref(),
            std::env::var("PRDFORGE_TEXT_MODEL").ok().as_deref(),
            std::env::var("PRDFORGE_IMAGE_MODEL").ok().as_deref(),
        );
        if let Some(dir) = data_dir_override {
            config.data_dir = dir;
        }
        config
    }

    /// Build a Config from raw string values (as they would come from env
    /// vars). Used directly in tests to avoid mutating process-global
    /// environment.
    pub fn from_raw_values(
        data_dir: Option<&str>,
        api_key: Option<&str>,
        text_model: Option<&str>,
        image_model: Option<&str>,
    ) -> Self {
        let data_dir = data_dir
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let api_key = api_key.filter(|s| !s.is_empty()).map(String::from);

        let text_model = text_model
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_TEXT_MODEL)
            .to_string();

        let image_model = image_model
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_IMAGE_MODEL)
            .to_string();

        Config {
            data_dir,
            api_key,
            text_model,
            image_model,
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("projects.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("prdforge.log")
    }

    /// Provenance tag written into records created by the AI path,
    /// e.g. "gemini-2.5-flash" becomes "Gemini 2.5 Flash".
    pub fn model_tag(&self) -> String {
        model_display_name(&self.text_model)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".prdforge")
}

fn model_display_name(model: &str) -> String {
    model
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
