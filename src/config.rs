use std::path::PathBuf;

/// Runtime configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the panchanga calculation service.
    pub api_base_url: String,
    /// Directory backing the persistent storage channel.
    pub data_dir: PathBuf,
    /// Directory where exported iCal downloads are saved.
    pub download_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            api_base_url: std::env::var("PANCHANGA_API_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            data_dir: std::env::var("PANCHANGA_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".panchanga")),
            download_dir: std::env::var("PANCHANGA_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        };

        if config.api_base_url.trim().is_empty() {
            anyhow::bail!("PANCHANGA_API_URL cannot be empty");
        }
        if !config.api_base_url.starts_with("http://")
            && !config.api_base_url.starts_with("https://")
        {
            anyhow::bail!("PANCHANGA_API_URL must start with http:// or https://");
        }
        url::Url::parse(&config.api_base_url)
            .map_err(|e| anyhow::anyhow!("PANCHANGA_API_URL is not a valid URL: {}", e))?;

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("API base URL: {}", config.api_base_url);
        tracing::debug!("Data dir: {}", config.data_dir.display());
        tracing::debug!("Download dir: {}", config.download_dir.display());

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        // Direct construction mirrors what from_env produces
        let base = "http://localhost:8080/".trim_end_matches('/').to_string();
        assert_eq!(base, "http://localhost:8080");
        assert!(url::Url::parse(&base).is_ok());
        let _ = Config {
            api_base_url: base,
            data_dir: PathBuf::from(".panchanga"),
            download_dir: PathBuf::from("."),
        };
    }
}
