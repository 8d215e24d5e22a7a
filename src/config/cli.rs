use crate::domain::model::{BirthInput, Gender};
use crate::domain::ports::{ConfigProvider, OutputFormat};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "bazi")]
#[command(about = "Compute a Four Pillars (八字) chart from a birth date and hour")]
pub struct CliConfig {
    #[arg(long, allow_negative_numbers = true)]
    pub year: i32,

    #[arg(long, allow_negative_numbers = true, help = "Gregorian month, 1-12")]
    pub month: i32,

    #[arg(long, allow_negative_numbers = true)]
    pub day: i32,

    #[arg(long, allow_negative_numbers = true, help = "Hour of day, 0-23")]
    pub hour: i32,

    #[arg(long, default_value = "male", help = "male/female (or 男/女)")]
    pub gender: Gender,

    #[arg(long, value_enum, help = "Output format (overrides the config file)")]
    pub format: Option<OutputFormat>,

    #[arg(long, help = "Disable result memoization")]
    pub no_cache: bool,

    #[arg(long, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn birth_input(&self) -> BirthInput {
        BirthInput::new(self.year, self.month, self.day, self.hour, self.gender)
    }
}

impl ConfigProvider for CliConfig {
    fn cache_enabled(&self) -> bool {
        !self.no_cache
    }

    fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    fn pretty_json(&self) -> bool {
        true
    }
}
