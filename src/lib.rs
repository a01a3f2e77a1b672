pub mod cli;
pub mod components;
pub mod error;
pub mod param;

use std::{fs, path::Path};

use serde::Deserialize;

use crate::{
    components::sidenav::{MenuId, MenuItem, Presentation, SidenavSelector},
    error::{Result, SidenavError},
};

#[derive(Debug, Deserialize)]
pub struct SidenavConfig {
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    #[serde(default)]
    pub active_id: MenuId,
    #[serde(flatten)]
    pub presentation: Presentation,
}

impl SidenavConfig {
    // 按初始输入构造选择器，id 为真值时立即解析
    pub fn into_selector(self) -> SidenavSelector {
        let mut selector = SidenavSelector::new(self.menu).with_presentation(self.presentation);
        selector.on_active_id_changed(self.active_id);
        selector
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub sidenav: SidenavConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = read_file(path)?;
        Ok(serde_json::from_str(&config_str)?)
    }
}

/// 读取一个只包含菜单数组的 JSON 文件
pub fn load_menu(path: &Path) -> Result<Vec<MenuItem>> {
    let menu_str = read_file(path)?;
    Ok(MenuItem::from_json(&menu_str)?)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| SidenavError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[test]
fn test_config() {
    let config = Config::load(Path::new("asset/cfg.json")).unwrap();
    assert_eq!(config.sidenav.menu.len(), 3);
    assert_eq!(config.sidenav.active_id, MenuId::Num(21.0));
    assert_eq!(
        config.sidenav.presentation.animation.get("duration"),
        Some(&serde_json::json!(300))
    );

    let selector = config.sidenav.into_selector();
    assert_eq!(
        selector.active_item().and_then(|item| item.name.as_deref()),
        Some("Reports")
    );
}

#[test]
fn test_config_defaults() {
    let config: Config = serde_json::from_str(r#"{ "sidenav": {} }"#).unwrap();
    assert!(config.sidenav.menu.is_empty());
    assert_eq!(config.sidenav.active_id, MenuId::Num(0.0));
    assert_eq!(config.sidenav.presentation, Presentation::default());
    assert!(config.sidenav.into_selector().active_item().is_none());
}

#[test]
fn test_missing_config_file() {
    let err = Config::load(Path::new("asset/missing.json")).unwrap_err();
    assert!(matches!(err, SidenavError::Io { .. }));
}
