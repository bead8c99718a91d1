//! Profiles command implementation

use super::OutputFormat;
use crate::profile::{all_profiles, RiskAppetite, StrategyArchetype};
use clap::Args;

#[derive(Args, Debug)]
pub struct ProfilesArgs {
    /// Only show this archetype
    #[arg(long, value_enum)]
    pub archetype: Option<StrategyArchetype>,

    /// Only show this appetite
    #[arg(long, value_enum)]
    pub appetite: Option<RiskAppetite>,

    /// Output format: table or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl ProfilesArgs {
    pub fn execute(&self) -> anyhow::Result<()> {
        println!("{}", self.render()?);
        Ok(())
    }

    pub fn render(&self) -> anyhow::Result<String> {
        let rows: Vec<_> = all_profiles()
            .iter()
            .filter(|e| self.archetype.map_or(true, |a| a == e.archetype))
            .filter(|e| self.appetite.map_or(true, |a| a == e.appetite))
            .collect();

        if rows.is_empty() {
            anyhow::bail!("No profiles match the given filters");
        }

        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&rows)?),
            OutputFormat::Table => Ok(rows
                .iter()
                .map(|e| {
                    let title = format!(
                        "{} / {}",
                        e.archetype.as_str().replace('_', " ").to_uppercase(),
                        e.appetite.as_str().to_uppercase()
                    );
                    e.config.summary(&title)
                })
                .collect::<Vec<_>>()
                .join("")),
        }
    }
}
