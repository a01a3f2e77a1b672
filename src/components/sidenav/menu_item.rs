use std::{
    convert::Infallible,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Serialize, Serializer};

/// 菜单项标识，数字或字符串。比较是严格的：`1` 与 `"1"` 不相等
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MenuId {
    Num(f64),
    Text(String),
}

// 2^53，超过后 f64 不再能精确表示整数
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

impl MenuId {
    // 0、NaN 与空字符串视为“未指定”
    pub fn is_truthy(&self) -> bool {
        match self {
            MenuId::Num(n) => *n != 0.0 && !n.is_nan(),
            MenuId::Text(s) => !s.is_empty(),
        }
    }
}

impl PartialEq for MenuId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MenuId::Num(a), MenuId::Num(b)) => a == b,
            (MenuId::Text(a), MenuId::Text(b)) => a == b,
            _ => false,
        }
    }
}

// NaN 只能来自手工构造，JSON 与 FromStr 都不会产生
impl Eq for MenuId {}

impl Hash for MenuId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            MenuId::Num(n) => {
                0u8.hash(state);
                // -0.0 与 0.0 相等，哈希也要一致
                let n = if *n == 0.0 { 0.0 } else { *n };
                n.to_bits().hash(state);
            }
            MenuId::Text(s) => {
                1u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl Serialize for MenuId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // 整数值按整数输出，避免 1 变成 1.0
            MenuId::Num(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            MenuId::Num(n) => serializer.serialize_f64(*n),
            MenuId::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl Default for MenuId {
    fn default() -> Self {
        MenuId::Num(0.0)
    }
}

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuId::Num(n) => write!(f, "{n}"),
            MenuId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for MenuId {
    type Err = Infallible;

    // 能解析为有限数字则按数字处理，否则按字符串处理
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<f64>() {
            Ok(n) if n.is_finite() => MenuId::Num(n),
            _ => MenuId::Text(s.to_string()),
        })
    }
}

impl From<f64> for MenuId {
    fn from(n: f64) -> Self {
        MenuId::Num(n)
    }
}

impl From<i32> for MenuId {
    fn from(n: i32) -> Self {
        MenuId::Num(n.into())
    }
}

impl From<&str> for MenuId {
    fn from(s: &str) -> Self {
        MenuId::Text(s.to_string())
    }
}

impl From<String> for MenuId {
    fn from(s: String) -> Self {
        MenuId::Text(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default)]
    pub id: MenuId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<Vec<MenuItem>>,
}

impl MenuItem {
    pub fn new(id: impl Into<MenuId>, name: impl Into<String>) -> Self {
        MenuItem {
            id: id.into(),
            name: Some(name.into()),
            icon: None,
            menu: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_menu(mut self, menu: Vec<MenuItem>) -> Self {
        self.menu = Some(menu);
        self
    }

    /// 子菜单是否存在。空数组也算存在
    pub fn has_submenu(&self) -> bool {
        self.menu.is_some()
    }

    /// 子菜单，不存在时为空切片
    pub fn submenu(&self) -> &[MenuItem] {
        self.menu.as_deref().unwrap_or_default()
    }

    /// 只复制 id、name、icon，不带子菜单
    pub fn shallow(&self) -> Self {
        MenuItem {
            id: self.id.clone(),
            name: self.name.clone(),
            icon: self.icon.clone(),
            menu: None,
        }
    }

    // 从 JSON 数组反序列化出整个菜单
    pub fn from_json(json_str: &str) -> Result<Vec<MenuItem>, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    pub fn to_json(menu: &[MenuItem]) -> Result<String, serde_json::Error> {
        serde_json::to_string(menu)
    }
}

#[test]
fn test_menu_from_json() {
    let json_data = r#"
        [
          { "id": 1, "name": "Home", "icon": "home" },
          {
            "id": "settings",
            "name": "Settings",
            "menu": [
              { "id": 21, "name": "Audio" },
              { "id": 22, "name": "Video", "menu": [] }
            ]
          },
          { "id": 3 }
        ]
        "#;

    let menu = MenuItem::from_json(json_data).unwrap();
    assert_eq!(menu.len(), 3);

    // 验证 Home 节点
    assert_eq!(menu[0].id, MenuId::Num(1.0));
    assert_eq!(menu[0].icon.as_deref(), Some("home"));
    assert!(!menu[0].has_submenu());

    // 验证 Settings 节点
    assert_eq!(menu[1].id, MenuId::Text("settings".to_string()));
    assert_eq!(menu[1].submenu().len(), 2);
    assert_eq!(menu[1].submenu()[0].name.as_deref(), Some("Audio"));

    // 空子菜单也算存在
    let video = &menu[1].submenu()[1];
    assert!(video.has_submenu());
    assert!(video.submenu().is_empty());

    // name 可以缺省
    assert_eq!(menu[2].name, None);
}

#[test]
fn test_menu_to_json_skips_absent_fields() {
    let menu = vec![MenuItem::new(1, "A").with_menu(vec![MenuItem::new(11, "A1")])];
    let json = MenuItem::to_json(&menu).unwrap();
    assert_eq!(
        json,
        r#"[{"id":1,"name":"A","menu":[{"id":11,"name":"A1"}]}]"#
    );
}

#[test]
fn test_menu_id_truthiness() {
    assert!(!MenuId::Num(0.0).is_truthy());
    assert!(!MenuId::Text(String::new()).is_truthy());
    assert!(MenuId::Num(-1.0).is_truthy());
    assert!(MenuId::from("0").is_truthy());
    assert!(!MenuId::default().is_truthy());
}

#[test]
fn test_menu_id_parse_and_strict_eq() {
    assert_eq!("21".parse::<MenuId>().unwrap(), MenuId::Num(21.0));
    assert_eq!("b".parse::<MenuId>().unwrap(), MenuId::from("b"));
    assert_ne!(MenuId::Num(1.0), MenuId::from("1"));
}

#[test]
fn test_shallow_drops_submenu() {
    let item = MenuItem::new(2, "B")
        .with_icon("folder")
        .with_menu(vec![MenuItem::new(21, "B1")]);
    let copy = item.shallow();
    assert_eq!(copy.id, item.id);
    assert_eq!(copy.icon.as_deref(), Some("folder"));
    assert_eq!(copy.menu, None);
}

#[test]
fn test_float_and_large_ids() {
    let json_data = r#"
        [
          { "id": 1.5, "name": "half" },
          { "id": 2, "menu": [{ "id": 1e20, "name": "big" }] }
        ]
        "#;
    let menu = MenuItem::from_json(json_data).unwrap();
    assert_eq!(menu[0].id, MenuId::Num(1.5));
    assert_eq!(menu[1].submenu()[0].id, MenuId::Num(1e20));

    let json = MenuItem::to_json(&menu[..1]).unwrap();
    assert_eq!(json, r#"[{"id":1.5,"name":"half"}]"#);
    assert_eq!(MenuItem::from_json(&json).unwrap()[0], menu[0]);

    let found = super::recompute(&menu, &MenuId::Num(1.5)).unwrap();
    assert_eq!(found.name.as_deref(), Some("half"));
    let found = super::recompute(&menu, &MenuId::Num(1e20)).unwrap();
    assert_eq!(found.id, MenuId::Num(2.0));
}

#[test]
fn test_menu_id_display_and_float_parse() {
    assert_eq!(MenuId::Num(21.0).to_string(), "21");
    assert_eq!(MenuId::Num(1.5).to_string(), "1.5");
    assert_eq!(MenuId::from("home").to_string(), "home");
    assert_eq!("1.5".parse::<MenuId>().unwrap(), MenuId::Num(1.5));
    assert_eq!("NaN".parse::<MenuId>().unwrap(), MenuId::from("NaN"));
    assert!(!MenuId::Num(f64::NAN).is_truthy());
}
