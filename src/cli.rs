use std::{
    io::{self, Write},
    path::Path,
};

use tracing::warn;

use crate::{
    components::sidenav::{MenuId, MenuItem, SelectionState, SidenavSelector},
    error::Result,
    load_menu,
};

// 命令常量定义
pub const CMD_QUIT: &str = ":q";
pub const CMD_HELP: &str = "help";
pub const CMD_SHOW: &str = "show";
pub const CMD_STATE: &str = "state";
pub const CMD_ACTIVE: &str = "active";
pub const CMD_CLICK: &str = "click";
pub const CMD_MENU: &str = "menu";

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_cli_mode(mut selector: SidenavSelector) {
    // 每次点击产生的事件按 JSON 输出
    selector.subscribe(|event| match serde_json::to_string(event) {
        Ok(json) => println!("事件：{json}"),
        Err(e) => warn!("事件序列化失败: {e}"),
    });

    println!("进入命令行模式，输入 help 查看命令，:q 退出。");
    let mut input = String::new();
    let mut stdout = io::stdout();
    loop {
        print!("\\> ");
        let _ = stdout.flush();
        input.clear();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                println!("读取输入失败");
                continue;
            }
        }
        match handle_command(&mut selector, input.trim(), &mut stdout) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => println!("{e}"),
        }
    }
    println!("已退出命令行模式。");
}

pub fn handle_command(
    selector: &mut SidenavSelector,
    input: &str,
    out: &mut impl Write,
) -> Result<Flow> {
    let (cmd, arg) = match input.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (input, ""),
    };

    match cmd {
        CMD_QUIT => return Ok(Flow::Quit),
        CMD_HELP => help(out)?,
        CMD_SHOW => {
            let active = selector.active_item().map(|item| &item.id);
            write_tree(out, selector.menu(), active, 0)?;
        }
        CMD_STATE => write_state(out, selector)?,
        CMD_ACTIVE => {
            let id: MenuId = match arg.parse() {
                Ok(id) => id,
                Err(never) => match never {},
            };
            selector.on_active_id_changed(id);
            write_state(out, selector)?;
        }
        CMD_CLICK => match arg.parse::<usize>() {
            Ok(index) => match selector.menu().get(index).cloned() {
                Some(item) => {
                    selector.on_item_clicked(&item, index);
                    write_state(out, selector)?;
                }
                None => writeln!(out, "索引越界：{index}")?,
            },
            Err(_) => writeln!(out, "用法：{CMD_CLICK} <index>")?,
        },
        CMD_MENU => {
            if arg.is_empty() {
                // 不带路径时输出当前菜单
                writeln!(out, "{}", MenuItem::to_json(selector.menu())?)?;
            } else {
                selector.set_menu(load_menu(Path::new(arg))?);
                writeln!(out, "菜单已载入，共 {} 项", selector.menu().len())?;
            }
        }
        "" => {}
        _ => writeln!(out, "未知命令，输入 help 查看帮助")?,
    }
    Ok(Flow::Continue)
}

fn write_state(out: &mut impl Write, selector: &SidenavSelector) -> Result<()> {
    match selector.selection_state() {
        SelectionState::Unselected => writeln!(out, "状态：未选中")?,
        SelectionState::Selected(item) => {
            writeln!(out, "状态：已选中 {}", serde_json::to_string(item)?)?
        }
    }
    Ok(())
}

// 缩进输出菜单树，选中的顶层项用 * 标记
fn write_tree(
    out: &mut impl Write,
    menu: &[MenuItem],
    active: Option<&MenuId>,
    depth: usize,
) -> Result<()> {
    for (index, item) in menu.iter().enumerate() {
        let marker = if depth == 0 && active == Some(&item.id) {
            '*'
        } else {
            ' '
        };
        writeln!(
            out,
            "{:indent$}{marker} [{index}] {} ({})",
            "",
            item.name.as_deref().unwrap_or("-"),
            item.id,
            indent = depth * 2,
        )?;
        write_tree(out, item.submenu(), active, depth + 1)?;
    }
    Ok(())
}

fn help(out: &mut impl Write) -> Result<()> {
    // 命令及描述列表
    let mut helps = vec![
        (CMD_SHOW, "显示菜单树"),
        (CMD_STATE, "查看选中状态"),
        ("active <id>", "设置激活 id"),
        ("click <index>", "点击顶层菜单项"),
        ("menu [path]", "从文件载入菜单，不带路径时输出当前菜单"),
        (CMD_HELP, "查看帮助"),
        (CMD_QUIT, "退出"),
    ];
    writeln!(out, "命令列表：")?;
    // 按命令字母顺序排序
    helps.sort_by(|a, b| a.0.cmp(b.0));
    for (cmd, desc) in helps {
        writeln!(out, "  {cmd:<14}  {desc}")?;
    }
    Ok(())
}

#[cfg(test)]
fn run(selector: &mut SidenavSelector, input: &str) -> String {
    let mut out = Vec::new();
    handle_command(selector, input, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[cfg(test)]
fn sample_selector() -> SidenavSelector {
    SidenavSelector::new(vec![
        MenuItem::new(1, "A"),
        MenuItem::new(2, "B").with_menu(vec![MenuItem::new(21, "B1")]),
    ])
}

#[test]
fn test_show_marks_active_top_level() {
    let mut selector = sample_selector();
    run(&mut selector, "active 21");
    let output = run(&mut selector, "show");
    assert_eq!(output, "  [0] A (1)\n* [1] B (2)\n    [0] B1 (21)\n");
}

#[test]
fn test_click_toggles() {
    let mut selector = sample_selector();
    let output = run(&mut selector, "click 1");
    assert!(output.starts_with("状态：已选中"));
    let output = run(&mut selector, "click 1");
    assert_eq!(output, "状态：未选中\n");
}

#[test]
fn test_click_bad_input() {
    let mut selector = sample_selector();
    assert_eq!(run(&mut selector, "click 5"), "索引越界：5\n");
    assert_eq!(run(&mut selector, "click x"), "用法：click <index>\n");
    assert_eq!(selector.active_item(), None);
}

#[test]
fn test_active_string_id() {
    let mut selector = SidenavSelector::new(vec![MenuItem::new("home", "Home")]);
    run(&mut selector, "active home");
    assert_eq!(selector.active_id(), &MenuId::from("home"));
    assert!(selector.active_item().is_some());
}

#[test]
fn test_quit_and_unknown() {
    let mut selector = sample_selector();
    let mut out = Vec::new();
    assert_eq!(
        handle_command(&mut selector, CMD_QUIT, &mut out).unwrap(),
        Flow::Quit
    );
    assert_eq!(run(&mut selector, "nope"), "未知命令，输入 help 查看帮助\n");
    assert_eq!(run(&mut selector, ""), "");
}

#[test]
fn test_menu_missing_file() {
    let mut selector = sample_selector();
    let mut out = Vec::new();
    assert!(handle_command(&mut selector, "menu asset/missing.json", &mut out).is_err());
    assert_eq!(selector.menu().len(), 2);
}

#[test]
fn test_menu_without_path_dumps_json() {
    let mut selector = SidenavSelector::new(vec![MenuItem::new(1, "A"), MenuItem::new(1.5, "B")]);
    assert_eq!(
        run(&mut selector, "menu"),
        "[{\"id\":1,\"name\":\"A\"},{\"id\":1.5,\"name\":\"B\"}]\n"
    );
}

#[test]
fn test_show_prints_text_ids_plainly() {
    let mut selector = SidenavSelector::new(vec![MenuItem::new("home", "Home")]);
    run(&mut selector, "active home");
    assert_eq!(run(&mut selector, "show"), "* [0] Home (home)\n");
}
