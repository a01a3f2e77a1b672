pub use self::menu_item::{MenuId, MenuItem};
pub use self::sidenav_state::{NavSelection, SelectionState, SidenavEvent, recompute};

pub mod menu_item;
pub mod sidenav_state;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// 仅供展示层使用的参数，这里只保存不解释
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Presentation {
    pub show: bool,
    pub animate: bool,
    pub with_arrow: bool,
    pub animation: Map<String, Value>,
}

impl Default for Presentation {
    fn default() -> Self {
        Presentation {
            show: true,
            animate: false,
            with_arrow: true,
            animation: Map::new(),
        }
    }
}

type Listener = Box<dyn FnMut(&SidenavEvent)>;

pub struct SidenavSelector {
    menu: Vec<MenuItem>,
    active_id: MenuId,
    presentation: Presentation,
    active_item: Option<MenuItem>,
    listeners: Vec<Listener>,
}

impl SidenavSelector {
    pub fn new(menu: Vec<MenuItem>) -> Self {
        SidenavSelector {
            menu,
            active_id: MenuId::default(),
            presentation: Presentation::default(),
            active_item: None,
            listeners: Vec::new(),
        }
    }

    pub fn with_presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = presentation;
        self
    }

    pub fn menu(&self) -> &[MenuItem] {
        &self.menu
    }

    pub fn active_id(&self) -> &MenuId {
        &self.active_id
    }

    pub fn active_item(&self) -> Option<&MenuItem> {
        self.active_item.as_ref()
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn selection_state(&self) -> SelectionState<'_> {
        self.active_item.as_ref().into()
    }

    /// 注册事件监听，按注册顺序同步调用
    pub fn subscribe(&mut self, listener: impl FnMut(&SidenavEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// 替换菜单输入，并按当前 id 重新推导选中项
    pub fn set_menu(&mut self, menu: Vec<MenuItem>) {
        self.menu = menu;
        self.active_item = recompute(&self.menu, &self.active_id);
        debug!(active = ?self.active_item.as_ref().map(|item| &item.id), "menu replaced");
    }

    pub fn on_active_id_changed(&mut self, new_id: MenuId) {
        self.active_item = None;
        self.active_id = new_id;
        if self.active_id.is_truthy() {
            self.active_item = recompute(&self.menu, &self.active_id);
        }
        debug!(
            active_id = %self.active_id,
            resolved = ?self.active_item.as_ref().map(|item| &item.id),
            "active id changed"
        );
    }

    /// 处理用户点击，返回本次发出的事件。
    ///
    /// 再次点击带子菜单的当前项会取消选中并发出 `None`。子菜单取自
    /// 当前菜单中 `index` 位置的项，而不是传入的 `item`。
    pub fn on_item_clicked(&mut self, item: &MenuItem, index: usize) -> SidenavEvent {
        if let Some(active) = &self.active_item {
            if active.id == item.id && active.has_submenu() {
                debug!(id = %item.id, "toggled off");
                self.active_item = None;
                self.emit(None);
                return None;
            }
        }

        let event = Some(NavSelection {
            id: item.id.clone(),
            name: item.name.clone(),
            icon: item.icon.clone(),
            index,
        });
        self.emit(event.clone());

        let mut active = item.shallow();
        match self.menu.get(index) {
            Some(source) => active.menu = source.menu.clone(),
            None => warn!(index, len = self.menu.len(), "clicked index outside menu"),
        }
        debug!(id = %active.id, index, "selected");
        self.active_item = Some(active);

        event
    }

    fn emit(&mut self, event: SidenavEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

impl fmt::Debug for SidenavSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SidenavSelector")
            .field("menu", &self.menu)
            .field("active_id", &self.active_id)
            .field("presentation", &self.presentation)
            .field("active_item", &self.active_item)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    fn scenario_menu() -> Vec<MenuItem> {
        vec![
            MenuItem::new(1, "A"),
            MenuItem::new(2, "B").with_menu(vec![MenuItem::new(21, "B1")]),
        ]
    }

    fn recorded(selector: &mut SidenavSelector) -> Rc<RefCell<Vec<SidenavEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        selector.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        events
    }

    #[test]
    fn starts_unselected() {
        let selector = SidenavSelector::new(scenario_menu());
        assert_eq!(selector.selection_state(), SelectionState::Unselected);
        assert_eq!(selector.active_id(), &MenuId::Num(0.0));
        assert!(selector.presentation().show);
        assert!(selector.presentation().with_arrow);
        assert!(!selector.presentation().animate);
    }

    #[test]
    fn click_item_with_submenu() {
        let mut selector = SidenavSelector::new(scenario_menu());
        let events = recorded(&mut selector);

        let item = selector.menu()[1].clone();
        let event = selector.on_item_clicked(&item, 1);

        let expected = NavSelection {
            id: MenuId::Num(2.0),
            name: Some("B".to_string()),
            icon: None,
            index: 1,
        };
        assert_eq!(event, Some(expected.clone()));
        assert_eq!(*events.borrow(), vec![Some(expected)]);
        assert_eq!(
            selector.active_item(),
            Some(&MenuItem::new(2, "B").with_menu(vec![MenuItem::new(21, "B1")]))
        );
    }

    #[test]
    fn active_id_resolves_to_ancestor() {
        let mut selector = SidenavSelector::new(scenario_menu());
        selector.on_active_id_changed(MenuId::Num(21.0));
        assert_eq!(selector.active_item(), Some(&selector.menu()[1].clone()));
        assert_eq!(selector.active_id(), &MenuId::Num(21.0));
    }

    #[test]
    fn active_id_is_idempotent() {
        let mut selector = SidenavSelector::new(scenario_menu());
        selector.on_active_id_changed(MenuId::Num(21.0));
        let first = selector.active_item().cloned();
        selector.on_active_id_changed(MenuId::Num(21.0));
        assert_eq!(selector.active_item().cloned(), first);
    }

    #[test]
    fn falsy_or_unknown_id_clears_selection() {
        let mut selector = SidenavSelector::new(scenario_menu());
        selector.on_active_id_changed(MenuId::Num(1.0));
        assert!(selector.active_item().is_some());

        selector.on_active_id_changed(MenuId::Num(0.0));
        assert_eq!(selector.active_item(), None);

        selector.on_active_id_changed(MenuId::Num(1.0));
        selector.on_active_id_changed(MenuId::from(""));
        assert_eq!(selector.active_item(), None);

        selector.on_active_id_changed(MenuId::Num(404.0));
        assert_eq!(selector.active_item(), None);
    }

    #[test]
    fn active_id_change_overrides_click() {
        let mut selector = SidenavSelector::new(scenario_menu());
        let item = selector.menu()[0].clone();
        selector.on_item_clicked(&item, 0);
        selector.on_active_id_changed(MenuId::Num(2.0));
        assert_eq!(selector.active_item().map(|item| &item.id), Some(&MenuId::Num(2.0)));
    }

    #[test]
    fn second_click_on_parent_toggles_off() {
        let mut selector = SidenavSelector::new(scenario_menu());
        let events = recorded(&mut selector);
        let item = selector.menu()[1].clone();

        selector.on_item_clicked(&item, 1);
        let event = selector.on_item_clicked(&item, 1);

        assert_eq!(event, None);
        assert_eq!(selector.selection_state(), SelectionState::Unselected);
        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert!(events[0].is_some());
        assert_eq!(events[1], None);
    }

    #[test]
    fn leaf_clicked_twice_selects_twice() {
        let mut selector = SidenavSelector::new(scenario_menu());
        let events = recorded(&mut selector);
        let item = selector.menu()[0].clone();

        selector.on_item_clicked(&item, 0);
        selector.on_item_clicked(&item, 0);

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], events[1]);
        assert_eq!(events[1].as_ref().map(|e| e.index), Some(0));
        assert_eq!(selector.active_item(), Some(&MenuItem::new(1, "A")));
    }

    #[test]
    fn empty_submenu_still_toggles_off() {
        let mut selector =
            SidenavSelector::new(vec![MenuItem::new("x", "X").with_menu(Vec::new())]);
        let item = selector.menu()[0].clone();

        selector.on_item_clicked(&item, 0);
        assert_eq!(selector.active_item().and_then(|a| a.menu.as_ref()), Some(&Vec::new()));
        assert_eq!(selector.on_item_clicked(&item, 0), None);
        assert_eq!(selector.active_item(), None);
    }

    #[test]
    fn submenu_comes_from_live_menu_index() {
        let mut selector = SidenavSelector::new(scenario_menu());
        // 传入的项没有子菜单，但 index 指向的项有
        let clicked = MenuItem::new(1, "A").with_icon("home");
        selector.on_item_clicked(&clicked, 1);

        let active = selector.active_item().unwrap();
        assert_eq!(active.id, MenuId::Num(1.0));
        assert_eq!(active.icon.as_deref(), Some("home"));
        assert_eq!(active.submenu(), &[MenuItem::new(21, "B1")]);
    }

    #[test]
    fn out_of_range_index_selects_without_submenu() {
        let mut selector = SidenavSelector::new(scenario_menu());
        let item = selector.menu()[1].clone();
        let event = selector.on_item_clicked(&item, 9);
        assert_eq!(event.map(|e| e.index), Some(9));
        assert_eq!(selector.active_item(), Some(&MenuItem::new(2, "B")));
    }

    #[test]
    fn click_other_item_switches_selection() {
        let mut selector = SidenavSelector::new(scenario_menu());
        let b = selector.menu()[1].clone();
        let a = selector.menu()[0].clone();
        selector.on_item_clicked(&b, 1);
        let event = selector.on_item_clicked(&a, 0);
        assert_eq!(event.map(|e| e.id), Some(MenuId::Num(1.0)));
        assert_eq!(selector.active_item(), Some(&MenuItem::new(1, "A")));
    }

    #[test]
    fn resolved_parent_toggles_off_on_click() {
        let mut selector = SidenavSelector::new(scenario_menu());
        selector.on_active_id_changed(MenuId::Num(21.0));
        let item = selector.menu()[1].clone();
        assert_eq!(selector.on_item_clicked(&item, 1), None);
        assert_eq!(selector.active_item(), None);
    }

    #[test]
    fn set_menu_recomputes_from_scratch() {
        let mut selector = SidenavSelector::new(scenario_menu());
        selector.on_active_id_changed(MenuId::Num(21.0));
        selector.set_menu(vec![
            MenuItem::new(5, "E").with_menu(vec![MenuItem::new(21, "moved")]),
        ]);
        assert_eq!(selector.active_item().map(|item| &item.id), Some(&MenuId::Num(5.0)));

        selector.set_menu(Vec::new());
        assert_eq!(selector.active_item(), None);
    }

    #[test]
    fn listeners_called_in_order() {
        let mut selector = SidenavSelector::new(scenario_menu());
        let order = Rc::new(RefCell::new(Vec::new()));
        for n in 0..3 {
            let order = Rc::clone(&order);
            selector.subscribe(move |_| order.borrow_mut().push(n));
        }
        let item = selector.menu()[0].clone();
        selector.on_item_clicked(&item, 0);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }
}
