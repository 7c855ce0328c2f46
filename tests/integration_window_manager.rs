use ratatui::layout::Rect;

use retro_desk::actions::Command;
use retro_desk::pointer::{GestureState, PointerEvent, PointerPhase, PointerSource, PointerTracker};
use retro_desk::taskbar::{TaskbarAction, click_action, taskbar_buttons};
use retro_desk::window::{ClampPolicy, WindowManager, WindowRegistry, WmEvent};

const W1: u8 = 1;
const W2: u8 = 2;
const W3: u8 = 3;

fn manager(viewport: Rect) -> WindowManager<u8> {
    let registry = WindowRegistry::new()
        .with_window(W1, "About", 20, 10)
        .and_then(|r| r.with_window(W2, "Projects", 20, 10))
        .and_then(|r| r.with_window(W3, "Contact", 20, 10))
        .unwrap();
    let mut wm = WindowManager::new(registry);
    wm.set_viewport(viewport);
    wm
}

fn z(wm: &WindowManager<u8>, id: u8) -> Option<u64> {
    wm.window(id).and_then(|w| w.z_order())
}

#[test]
fn opening_two_windows_stacks_and_focuses_the_latest() {
    let mut wm = manager(Rect::new(0, 0, 80, 24));
    wm.open(W1);
    assert!(wm.window(W1).unwrap().is_open());
    assert_eq!(wm.focused(), Some(W1));
    assert_eq!(z(&wm, W1), Some(101));

    wm.open(W2);
    assert_eq!(wm.focused(), Some(W2));
    assert_eq!(z(&wm, W2), Some(102));
    assert!(wm.window(W1).unwrap().is_open());
    assert!(!wm.is_focused(W1));
}

#[test]
fn minimizing_the_only_window_clears_focus() {
    let mut wm = manager(Rect::new(0, 0, 80, 24));
    wm.open(W2);
    wm.open(W1);
    wm.close(W2);
    assert_eq!(z(&wm, W1), Some(102));
    wm.minimize(W1);
    assert_eq!(wm.focused(), None);
    assert!(wm.window(W1).unwrap().is_minimized());
}

#[test]
fn closing_the_focused_window_hands_focus_down_the_stack() {
    let mut wm = manager(Rect::new(0, 0, 80, 24));
    wm.open(W1);
    wm.open(W2);
    wm.open(W3);
    assert_eq!(
        [z(&wm, W1), z(&wm, W2), z(&wm, W3)],
        [Some(101), Some(102), Some(103)]
    );
    wm.close(W3);
    assert_eq!(wm.focused(), Some(W2));
    // the receiver is already on top of what is visible
    assert_eq!(z(&wm, W2), Some(102));
    assert_eq!(wm.z_counter(), 103);
}

#[test]
fn title_bar_drag_follows_the_pointer_offset() {
    let mut wm = manager(Rect::new(0, 0, 300, 200));
    wm.open(W1);
    wm.move_to(W1, 10, 20);
    let mut tracker = PointerTracker::new();
    let down = PointerEvent::new(PointerPhase::Down, 50, 60, PointerSource::Mouse);
    assert_eq!(tracker.begin(W1, wm.window(W1).unwrap().position(), &down), None);
    match tracker.state() {
        GestureState::Dragging(drag) => assert_eq!((drag.offset_x, drag.offset_y), (40, 40)),
        GestureState::Idle => panic!("gesture did not start"),
    }

    let motion = PointerEvent::new(PointerPhase::Move, 120, 130, PointerSource::Mouse);
    let (id, x, y) = tracker.update(&motion).unwrap();
    wm.move_to(id, x, y);
    assert_eq!(wm.window(W1).unwrap().position(), (80, 90));

    let up = PointerEvent::new(PointerPhase::Up, 120, 130, PointerSource::Mouse);
    assert_eq!(tracker.finish(&up), Some(W1));
    let late = PointerEvent::new(PointerPhase::Move, 0, 0, PointerSource::Mouse);
    assert_eq!(tracker.update(&late), None);
}

#[test]
fn contain_policy_keeps_the_whole_window_inside() {
    let mut wm = manager(Rect::new(0, 0, 80, 24));
    wm.open(W1);
    wm.drag(W1, -1000, -1000);
    assert_eq!(wm.window(W1).unwrap().position(), (0, 0));
    wm.drag(W1, 1000, 1000);
    assert_eq!(wm.window(W1).unwrap().position(), (60, 14));
}

#[test]
fn keep_visible_policy_leaves_a_margin_on_screen() {
    let viewport = Rect::new(0, 0, 80, 24);
    let mut wm = manager(viewport);
    wm.set_clamp_policy(ClampPolicy::keep_visible());
    wm.open(W1);

    wm.drag(W1, 10_000, 10_000);
    let rect = wm.window(W1).unwrap().rect();
    assert_eq!((rect.x, rect.y), (76, 20));
    assert_eq!(rect.visible_in(viewport).width, 4);

    wm.drag(W1, -10_000, -10_000);
    let rect = wm.window(W1).unwrap().rect();
    // never above the top edge, so the title bar stays reachable
    assert_eq!((rect.x, rect.y), (-16, 0));
    assert_eq!(rect.visible_in(viewport).width, 4);
}

#[test]
fn maximize_round_trip_restores_geometry() {
    let viewport = Rect::new(0, 0, 80, 23);
    let mut wm = manager(viewport);
    wm.open(W1);
    wm.move_to(W1, 5, 3);
    let before = wm.window(W1).unwrap().rect();

    wm.maximize_toggle(W1);
    let window = wm.window(W1).unwrap();
    assert!(window.is_maximized());
    assert_eq!(window.position(), (0, 0));
    assert_eq!(window.size(), (80, 23));

    // maximized windows do not move
    wm.drag(W1, 3, 3);
    assert_eq!(wm.window(W1).unwrap().position(), (0, 0));

    wm.maximize_toggle(W1);
    assert_eq!(wm.window(W1).unwrap().rect(), before);
    assert!(!wm.window(W1).unwrap().is_maximized());
}

#[test]
fn refocusing_the_top_window_is_a_no_op() {
    let mut wm = manager(Rect::new(0, 0, 80, 24));
    wm.open(W1);
    wm.open(W2);
    wm.take_events();
    let counter = wm.z_counter();
    wm.focus(W2);
    assert_eq!(wm.z_counter(), counter);
    assert!(wm.take_events().is_empty());
}

#[test]
fn commands_map_onto_operations_and_report_events() {
    let mut wm = manager(Rect::new(0, 0, 80, 24));
    wm.dispatch(Command::OpenAll);
    assert_eq!(wm.registry().open_ids(), vec![W1, W2, W3]);
    assert_eq!(wm.focused(), Some(W3));

    wm.take_events();
    wm.dispatch(Command::Minimize(W3));
    assert_eq!(
        wm.take_events(),
        vec![WmEvent::Minimized(W3), WmEvent::FocusChanged(Some(W2))]
    );

    wm.dispatch(Command::CloseAll);
    assert!(wm.registry().open_ids().is_empty());
    assert_eq!(wm.focused(), None);
    assert!(wm.take_events().contains(&WmEvent::FocusChanged(None)));
}

#[test]
fn taskbar_click_cycles_minimize_and_restore() {
    let mut wm = manager(Rect::new(0, 0, 80, 24));
    wm.open(W1);
    wm.open(W2);

    let buttons = taskbar_buttons(&wm);
    assert_eq!(buttons.iter().map(|b| b.id).collect::<Vec<_>>(), vec![W1, W2]);
    assert!(buttons[1].pressed && !buttons[0].pressed);

    let action = click_action(&wm, W2);
    assert_eq!(action, Some(TaskbarAction::Minimize(W2)));
    action.unwrap().apply(&mut wm);
    assert!(wm.window(W2).unwrap().is_minimized());
    assert_eq!(wm.focused(), Some(W1));

    click_action(&wm, W2).unwrap().apply(&mut wm);
    assert!(wm.window(W2).unwrap().is_visible());
    assert_eq!(wm.focused(), Some(W2));
}

#[test]
fn unknown_ids_are_ignored() {
    let mut wm = manager(Rect::new(0, 0, 80, 24));
    wm.open(42);
    wm.focus(42);
    wm.maximize_toggle(42);
    assert_eq!(wm.focused(), None);
    assert!(wm.take_events().is_empty());
}

#[test]
fn z_counter_exhaustion_keeps_the_stack_distinct() {
    let registry = WindowRegistry::new()
        .with_window(W1, "About", 20, 10)
        .and_then(|r| r.with_window(W2, "Projects", 20, 10))
        .unwrap();
    let mut wm = WindowManager::with_initial_z(registry, u64::MAX - 1);
    wm.set_viewport(Rect::new(0, 0, 80, 24));
    wm.open(W1);
    wm.open(W2);
    assert_ne!(z(&wm, W1), z(&wm, W2));
    assert!(z(&wm, W2) > z(&wm, W1));

    wm.focus(W1);
    assert_eq!(wm.topmost_visible(), Some(W1));
    assert_eq!(wm.draw_order(), vec![W2, W1]);

    let counter = wm.z_counter();
    wm.focus(W1);
    assert_eq!(wm.z_counter(), counter);
}

#[test]
fn restore_after_shrink_lands_inside_the_viewport() {
    let mut wm = manager(Rect::new(0, 0, 200, 60));
    wm.open(W1);
    wm.move_to(W1, 170, 50);
    assert_eq!(wm.window(W1).unwrap().position(), (170, 50));
    wm.maximize_toggle(W1);

    let small = Rect::new(0, 0, 80, 23);
    wm.set_viewport(small);
    wm.maximize_toggle(W1);
    let rect = wm.window(W1).unwrap().rect();
    assert_eq!((rect.x, rect.y), (60, 13));
    assert_eq!(rect.visible_in(small), Rect::new(60, 13, 20, 10));
}
