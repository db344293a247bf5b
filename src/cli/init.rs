//! Init command implementation
//!
//! Scaffolds a research project: `research.toml` with every default spelled
//! out, `.env.example` for the API key and a `.gitignore`.

use super::output::Output;
use crate::utils::config::ResearchConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (research.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.header("Initializing research project");

    let base_path = &config.path;
    if !base_path.exists() {
        if let Err(e) = fs::create_dir_all(base_path) {
            output.error(&format!("Failed to create {}: {}", base_path.display(), e));
            return InitResult::Error(e.to_string());
        }
    }

    let config_path = base_path.join("research.toml");
    if config_path.exists() && !config.force {
        output.warning("research.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    let toml_content = match generate_research_toml() {
        Ok(content) => content,
        Err(e) => {
            output.error(&format!("Failed to render research.toml: {}", e));
            return InitResult::Error(e);
        }
    };
    if let Err(e) = write_file(&config_path, &toml_content, config.force) {
        output.error(&format!("Failed to create research.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("config", "research.toml");

    let env_example_path = base_path.join(".env.example");
    if let Err(e) = write_file(&env_example_path, &generate_env_example(), config.force) {
        output.error(&format!("Failed to create .env.example: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("env", ".env.example");

    let gitignore_path = base_path.join(".gitignore");
    if gitignore_path.exists() {
        output.skipped(".gitignore", "already exists");
    } else if let Err(e) = write_file(&gitignore_path, &generate_gitignore(), false) {
        output.warning(&format!("Failed to create .gitignore: {}", e));
    } else {
        output.created("file", ".gitignore");
    }

    output.complete("Research project initialized successfully!");

    output.header("Next Steps");
    output.info("1. Set your Mistral API key (optional, heuristics are used without it):");
    output.command("cp .env.example .env");
    output.info("2. Run a research:");
    output.command("ares-research research \"meilleurs casques moto 2025\"");

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

fn generate_research_toml() -> Result<String, String> {
    let body = ResearchConfig::default()
        .to_toml_string()
        .map_err(|e| e.to_string())?;

    Ok(format!(
        "# ares-research configuration\n\
         #\n\
         # Every field is optional; the values below are the defaults.\n\
         # llm.model, llm.api_base and llm.api_key_env default per provider:\n\
         #   mistral  https://api.mistral.ai/v1   MISTRAL_API_KEY\n\
         #   openai   https://api.openai.com/v1   OPENAI_API_KEY\n\
         #   ollama   http://localhost:11434      (no key)\n\
         # The API key itself is read from that environment variable\n\
         # (a .env file is loaded at startup).\n\
         #\n\
         # Set plan.recency_year (e.g. 2025) to pin the year used in query\n\
         # variants and news filtering; it defaults to the current year.\n\n\
         {}",
        body
    ))
}

fn generate_env_example() -> String {
    r#"# Mistral AI API key used for planning and synthesis
MISTRAL_API_KEY=

# Needed only with [llm] provider = "openai"
# OPENAI_API_KEY=

# Log filter, e.g. "info" or "ares_research=debug"
# RUST_LOG=info
"#
    .to_string()
}

fn generate_gitignore() -> String {
    r#".env
/target
"#
    .to_string()
}
