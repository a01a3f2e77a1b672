use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::{Config, cli, error::Result};

#[derive(Debug, Parser)]
#[command(name = "simple_sidenav", about = "侧边导航选择器")]
pub struct Params {
    /// 指定配置文件路径
    #[arg(long)]
    pub cfg: Option<PathBuf>,
    /// cli模式
    #[arg(long)]
    pub cli: bool,
}

impl Params {
    pub fn config_path(&self) -> PathBuf {
        self.cfg
            .clone()
            .unwrap_or_else(|| PathBuf::from(default_config_path()))
    }
}

pub fn handle_params() -> Result<()> {
    let params = Params::parse();
    let path = params.config_path();
    let config = Config::load(&path)?;
    info!(path = %path.display(), items = config.sidenav.menu.len(), "config loaded");

    let selector = config.sidenav.into_selector();
    if params.cli {
        cli::run_cli_mode(selector);
        return Ok(());
    }

    match selector.active_item() {
        Some(item) => println!("当前选中：{}", serde_json::to_string(item)?),
        None => println!("当前无选中项"),
    }
    Ok(())
}

pub fn default_config_path() -> String {
    if cfg!(debug_assertions) {
        "asset/cfg.json".to_string()
    } else {
        "/etc/simple_sidenav/cfg.json".to_string()
    }
}

#[test]
fn test_params() {
    let params = Params::parse_from(["simple_sidenav", "--cfg", "menu.json", "--cli"]);
    assert!(params.cli);
    assert_eq!(params.config_path(), PathBuf::from("menu.json"));

    let params = Params::parse_from(["simple_sidenav"]);
    assert!(!params.cli);
    assert_eq!(params.config_path(), PathBuf::from(default_config_path()));
}
