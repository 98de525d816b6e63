//! Initialize floortriage in the current directory

use std::fs;
use std::path::Path;

use floortriage::adapters::model::EMBEDDED_MODEL;
use floortriage::adapters::toml::EMBEDDED_RULES;
use floortriage::config::DEFAULT_CONFIG;
use floortriage::output::{OperationResult, OutputMode};
use floortriage::paths;

/// Write the default configuration, rule table and model artifact
pub fn init(force: bool, mode: OutputMode) -> anyhow::Result<()> {
    let config_path = Path::new(paths::CONFIG_FILE);

    if config_path.exists() && !force {
        OperationResult {
            success: false,
            message: format!(
                "Already initialized ({} exists).\nUse --force to reinitialize.",
                paths::CONFIG_FILE
            ),
        }
        .render(mode);
        return Ok(());
    }

    let mut created = Vec::new();
    for (name, content) in [
        (paths::CONFIG_FILE, DEFAULT_CONFIG),
        (paths::RULES_FILE, EMBEDDED_RULES),
        (paths::MODEL_FILE, EMBEDDED_MODEL),
    ] {
        fs::write(name, content)?;
        created.push(format!("  Created {name}"));
    }
    fs::create_dir_all(paths::STATE_DIR)?;
    created.push(format!("  Created {}/", paths::STATE_DIR));

    OperationResult {
        success: true,
        message: format!(
            "Initializing floortriage...\n\n{}\n\nfloortriage initialized!\n\nNext steps:\n  \
             edit {} to add site-specific safety rules\n  \
             floortriage classify \"<description>\" --equipment <id> --shift-time <rfc3339>",
            created.join("\n"),
            paths::RULES_FILE
        ),
    }
    .render(mode);
    Ok(())
}
