use std::fs;
use std::path::Path;

use loan_engine_core::policy::LendingPolicy;

/// Load a lending policy from a JSON or YAML file (by extension), falling
/// back to the built-in defaults when no path is given. The policy is
/// validated once here, before any command runs with it.
pub fn load(path: Option<&str>) -> Result<LendingPolicy, Box<dyn std::error::Error>> {
    let policy = match path {
        None => LendingPolicy::default(),
        Some(path) => {
            let contents = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read policy '{}': {}", path, e))?;
            let is_yaml = Path::new(path)
                .extension()
                .map(|ext| ext == "yaml" || ext == "yml")
                .unwrap_or(false);
            if is_yaml {
                serde_yaml::from_str(&contents)
                    .map_err(|e| format!("Failed to parse policy '{}': {}", path, e))?
            } else {
                serde_json::from_str(&contents)
                    .map_err(|e| format!("Failed to parse policy '{}': {}", path, e))?
            }
        }
    };

    policy.validate()?;
    Ok(policy)
}
