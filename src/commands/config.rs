use anyhow::Result;
use owo_colors::OwoColorize;
use planner_core::PlannerConfig;

pub fn run(config: &PlannerConfig) -> Result<()> {
    let config_path = PlannerConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Data:    {}", config.data_file.display());
    println!("  Cache:   {}", config.cache_file.display());

    println!();
    println!("{}", "Effective settings".bold());
    for line in config.to_toml()?.lines() {
        println!("  {}", line);
    }

    Ok(())
}
