use serde::Serialize;

use super::menu_item::{MenuId, MenuItem};

/// 点击事件负载。`None` 表示取消选中
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavSelection {
    pub id: MenuId,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub index: usize,
}

pub type SidenavEvent = Option<NavSelection>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState<'a> {
    Unselected,
    Selected(&'a MenuItem),
}

impl<'a> From<Option<&'a MenuItem>> for SelectionState<'a> {
    fn from(item: Option<&'a MenuItem>) -> Self {
        match item {
            Some(item) => SelectionState::Selected(item),
            None => SelectionState::Unselected,
        }
    }
}

/// 由输入重新推导选中项。id 为假值时不搜索
pub fn recompute(menu: &[MenuItem], active_id: &MenuId) -> Option<MenuItem> {
    if !active_id.is_truthy() {
        return None;
    }
    find_active(menu, active_id).cloned()
}

/// 在顶层菜单中查找包含 `active_id` 的项，返回的总是顶层项。
///
/// 每个顶层项都会被检查，不提前退出；多个顶层项同时匹配时取最后一个。
pub fn find_active<'a>(menu: &'a [MenuItem], active_id: &MenuId) -> Option<&'a MenuItem> {
    let mut active = None;
    for item in menu {
        let below = has_active(item.menu.as_deref(), active_id);
        if item.id == *active_id || below {
            active = Some(item);
        }
    }
    active
}

/// 深度优先探测子树中是否存在 `active_id`，不修改任何状态
pub fn has_active(menu: Option<&[MenuItem]>, active_id: &MenuId) -> bool {
    let Some(menu) = menu else {
        return false;
    };
    menu.iter()
        .any(|item| item.id == *active_id || has_active(item.menu.as_deref(), active_id))
}

#[cfg(test)]
fn sample_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::new(1, "A"),
        MenuItem::new(2, "B").with_menu(vec![
            MenuItem::new(21, "B1"),
            MenuItem::new(22, "B2").with_menu(vec![MenuItem::new(221, "B2a")]),
        ]),
        MenuItem::new(3, "C").with_menu(vec![]),
    ]
}

#[test]
fn test_has_active() {
    let menu = sample_menu();
    assert!(has_active(Some(menu.as_slice()), &MenuId::Num(221.0)));
    assert!(has_active(Some(menu.as_slice()), &MenuId::Num(1.0)));
    assert!(!has_active(Some(menu.as_slice()), &MenuId::Num(4.0)));
    // 不存在与空子菜单等价
    assert!(!has_active(None, &MenuId::Num(1.0)));
    assert!(!has_active(Some(&[] as &[MenuItem]), &MenuId::Num(1.0)));
}

#[test]
fn test_find_active_returns_top_level_ancestor() {
    let menu = sample_menu();
    let found = find_active(&menu, &MenuId::Num(221.0)).unwrap();
    assert_eq!(found.id, MenuId::Num(2.0));

    let found = find_active(&menu, &MenuId::Num(3.0)).unwrap();
    assert_eq!(found.name.as_deref(), Some("C"));

    assert_eq!(find_active(&menu, &MenuId::Num(99.0)), None);
}

#[test]
fn test_find_active_last_match_wins() {
    let menu = vec![
        MenuItem::new(1, "first").with_menu(vec![MenuItem::new(7, "dup")]),
        MenuItem::new(2, "middle"),
        MenuItem::new(3, "last").with_menu(vec![
            MenuItem::new(30, "x").with_menu(vec![MenuItem::new(7, "dup")]),
        ]),
    ];
    let found = find_active(&menu, &MenuId::Num(7.0)).unwrap();
    assert_eq!(found.id, MenuId::Num(3.0));
}

#[test]
fn test_recompute_falsy_id() {
    let menu = sample_menu();
    assert_eq!(recompute(&menu, &MenuId::Num(0.0)), None);
    assert_eq!(recompute(&menu, &MenuId::from("")), None);
}

#[test]
fn test_recompute_is_strict_about_id_type() {
    let menu = sample_menu();
    assert_eq!(recompute(&menu, &MenuId::from("21")), None);
    assert_eq!(
        recompute(&menu, &MenuId::Num(21.0)).map(|item| item.id),
        Some(MenuId::Num(2.0))
    );
}

#[test]
fn test_nav_selection_json() {
    let event: SidenavEvent = Some(NavSelection {
        id: MenuId::Num(2.0),
        name: Some("B".to_string()),
        icon: None,
        index: 1,
    });
    assert_eq!(
        serde_json::to_string(&event).unwrap(),
        r#"{"id":2,"name":"B","icon":null,"index":1}"#
    );
    let none: SidenavEvent = None;
    assert_eq!(serde_json::to_string(&none).unwrap(), "null");
}
