pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use super::toml_config::{
        validate_provider, TomlConfig, DEFAULT_OUTPUT_PATH, DEFAULT_TIMEOUT_SECONDS,
    };
    use crate::adapters::http::DEFAULT_API_BASE_URL;
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::Validate;
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "employee-directory")]
    #[command(about = "Render an employee's posts and comments from a JSONPlaceholder-style API")]
    pub struct CliConfig {
        #[arg(long, default_value = DEFAULT_API_BASE_URL)]
        pub api_base_url: String,

        #[arg(long, help = "Employee id to select once the page has loaded")]
        pub employee: Option<u64>,

        #[arg(long, value_delimiter = ',', help = "Post ids whose comments to expand")]
        pub toggle: Vec<u64>,

        #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
        pub output_path: String,

        #[arg(long, help = "Print the page instead of writing index.html")]
        pub stdout: bool,

        #[arg(long, default_value = "5")]
        pub concurrent_requests: usize,

        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
        pub timeout_seconds: u64,

        #[arg(long, help = "TOML file whose [api]/[render] values override the flags")]
        pub config: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,
    }

    impl CliConfig {
        /// Values present in the TOML file replace the flag values.
        pub fn merge_toml(&mut self, toml: &TomlConfig) {
            if let Some(base_url) = &toml.api.base_url {
                self.api_base_url = base_url.clone();
            }
            if let Some(timeout) = toml.api.timeout_seconds {
                self.timeout_seconds = timeout;
            }
            if let Some(concurrent) = toml.render.concurrent_requests {
                self.concurrent_requests = concurrent;
            }
            if let Some(output_path) = &toml.render.output_path {
                self.output_path = output_path.clone();
            }
        }
    }

    impl ConfigProvider for CliConfig {
        fn api_base_url(&self) -> &str {
            &self.api_base_url
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn concurrent_requests(&self) -> usize {
            self.concurrent_requests
        }

        fn timeout_seconds(&self) -> u64 {
            self.timeout_seconds
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_provider(self)
        }
    }

}
