use crate::utils::config::{BenchConfig, SCHEMA_VERSION};

/// Display version information
pub fn display_version() {
    println!("Solver Bench v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Benchmarks a solver over a corpus and aggregates gprof flat profiles.");
}

/// Print the effective configuration as TOML
pub fn display_config(config: &BenchConfig) -> anyhow::Result<()> {
    let text = toml::to_string_pretty(config)?;
    println!("{}", text);
    Ok(())
}
