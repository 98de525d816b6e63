//! Rule table commands

use floortriage::adapters::toml::{embedded_rule_table, load_rule_table};
use floortriage::config::Config;
use floortriage::output::{OutputMode, RuleCheckResult, RuleListResult};

use crate::cli::app::RulesAction;

/// Handle rules subcommands
pub fn rules(action: RulesAction, config: &Config, mode: OutputMode) -> anyhow::Result<()> {
    match action {
        RulesAction::List => {
            let table = config.load_rules()?;
            let source = config
                .rules_path()
                .filter(|p| p.exists())
                .map_or_else(|| "embedded".to_string(), |p| p.display().to_string());
            RuleListResult {
                version: table.version().to_string(),
                source,
                rules: table.rules().to_vec(),
            }
            .render(mode);
            Ok(())
        },
        RulesAction::Check { path } => {
            let path = path.or_else(|| config.rules_path());
            let (label, loaded) = match &path {
                Some(p) => (p.display().to_string(), load_rule_table(p)),
                None => ("embedded".to_string(), embedded_rule_table()),
            };
            let result = match loaded {
                Ok(table) => RuleCheckResult {
                    path: label,
                    valid: true,
                    version: Some(table.version().to_string()),
                    rule_count: table.rules().len(),
                    error: None,
                },
                Err(err) => RuleCheckResult {
                    path: label,
                    valid: false,
                    version: None,
                    rule_count: 0,
                    error: Some(format!("{err:#}")),
                },
            };
            result.render(mode);
            if !result.valid {
                anyhow::bail!("rule table {} is invalid", result.path);
            }
            Ok(())
        },
    }
}
