use crate::config::Config;

pub fn cmd_init() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("✓ Created config.toml");
        println!("Set NIMBUS_WEATHER_API_KEY (or weather.api_key) before serving.");
    } else {
        println!("config.toml already exists, leaving it untouched.");
    }
    Ok(())
}
