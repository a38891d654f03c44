use std::path::Path;

use groupset_core::ControllerConfig;

pub fn init(config_path: &Path, data_dir: &Path, force: bool) -> anyhow::Result<()> {
    write_scaffold(config_path, data_dir, force)?;
    println!("✓ Generated {}", config_path.display());
    Ok(())
}

fn write_scaffold(config_path: &Path, data_dir: &Path, force: bool) -> anyhow::Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    let config = ControllerConfig::scaffold(data_dir);
    std::fs::write(config_path, config.to_toml_string()?)?;
    Ok(())
}
