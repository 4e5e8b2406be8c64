use crate::config::Config;

pub fn cmd_init() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("Created config.toml");
        println!("Set [search] api_key and search_engine_id before searching.");
    } else {
        println!("config.toml already exists");
    }
    Ok(())
}
