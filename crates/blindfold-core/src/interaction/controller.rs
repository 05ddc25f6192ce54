//! Pointer and keyboard state machine driving the sprite collection.

use std::rc::Rc;

use tracing::debug;

use super::events::{Command, ControlAction, Key, PointerTarget, Propagation};
use super::subscription::{ListenerHost, ListenerKind, Subscription};
use crate::config::EditorConfig;
use crate::geometry::Point;
use crate::sprite::{SpriteCollection, SpriteId, SpriteInstance, SpriteLimits};

/// An active drag gesture.
#[derive(Debug)]
pub struct Drag {
    /// Sprite being dragged, by stable id.
    pub sprite: SpriteId,
    /// Pointer position minus sprite position at grab time.
    pub offset: Point,
    /// Pointer-move/up registration, held only while dragging.
    listeners: Subscription,
}

#[derive(Debug, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(Drag),
}

/// Owns the sprite collection, the selection and the drag gesture.
///
/// The controller is the single authoritative owner of the collection;
/// everything else reads it through `sprites()`.
pub struct InteractionController {
    sprites: SpriteCollection,
    selection: Option<usize>,
    state: InteractionState,
    rotation_step: f64,
    scale_step: f64,
    host: Rc<dyn ListenerHost>,
    _keyboard: Subscription,
}

impl InteractionController {
    /// Create a controller and register its keyboard listeners.
    pub fn new(config: &EditorConfig, host: Rc<dyn ListenerHost>) -> Self {
        let keyboard = Subscription::acquire(host.clone(), ListenerKind::Keyboard);
        Self {
            sprites: SpriteCollection::new(SpriteLimits::from_config(config)),
            selection: None,
            state: InteractionState::Idle,
            rotation_step: config.rotation_step,
            scale_step: config.scale_step,
            host,
            _keyboard: keyboard,
        }
    }

    pub fn sprites(&self) -> &SpriteCollection {
        &self.sprites
    }

    /// Selected index, if any.
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn selected(&self) -> Option<&SpriteInstance> {
        self.selection.and_then(|i| self.sprites.get(i))
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging(_))
    }

    /// Index of the sprite currently being dragged.
    pub fn dragging_index(&self) -> Option<usize> {
        match &self.state {
            InteractionState::Dragging(drag) => self.sprites.index_of(drag.sprite),
            InteractionState::Idle => None,
        }
    }

    // --- Collection actions ---

    /// Append a sprite at the default transform. Selection is unchanged.
    pub fn add_sprite(&mut self) -> SpriteId {
        let id = self.sprites.add();
        debug!(%id, count = self.sprites.len(), "sprite added");
        id
    }

    /// Remove the sprite at `index`. Any deletion clears the selection and
    /// ends a drag.
    pub fn remove(&mut self, index: usize) {
        let Some(removed) = self.sprites.remove(index) else {
            return;
        };
        debug!(id = %removed.id, index, "sprite removed");
        self.deselect();
    }

    pub fn delete_selected(&mut self) {
        if let Some(index) = self.selection {
            self.remove(index);
        }
    }

    /// Clear the selection. A drag only exists on the selected sprite, so
    /// any drag in progress ends too.
    pub fn deselect(&mut self) {
        self.end_drag();
        if self.selection.take().is_some() {
            debug!("selection cleared");
        }
    }

    /// Drop every sprite, the selection and any drag. Used when the
    /// background image changes.
    pub fn reset(&mut self) {
        self.end_drag();
        self.selection = None;
        self.sprites.clear();
    }

    // --- Pointer input ---

    /// Dispatch a pointer-down the way the DOM bubbles it: the sprite handler
    /// runs first and may stop propagation before the canvas handler.
    pub fn pointer_down(&mut self, target: PointerTarget, pointer: Point) -> Propagation {
        let propagation = match target {
            PointerTarget::Sprite(index) => self.sprite_pointer_down(index, pointer),
            PointerTarget::Canvas | PointerTarget::Outside => Propagation::Continue,
        };

        if !propagation.is_stopped() {
            self.canvas_pointer_down(target);
        }
        propagation
    }

    /// Sprite-level handler: select the sprite and start dragging it.
    pub fn sprite_pointer_down(&mut self, index: usize, pointer: Point) -> Propagation {
        let Some(sprite) = self.sprites.get(index) else {
            return Propagation::Continue;
        };
        let (id, offset) = (sprite.id, pointer - sprite.position);

        // Release any stale registration before acquiring a new one.
        self.end_drag();

        self.selection = Some(index);
        self.state = InteractionState::Dragging(Drag {
            sprite: id,
            offset,
            listeners: Subscription::acquire(self.host.clone(), ListenerKind::Drag),
        });
        debug!(%id, index, "drag started");
        Propagation::Stop
    }

    /// Canvas-level handler: a press on the bare background deselects.
    pub fn canvas_pointer_down(&mut self, target: PointerTarget) {
        if target == PointerTarget::Canvas {
            self.deselect();
        }
    }

    /// Follow the pointer while dragging, keeping the grab offset.
    pub fn pointer_move(&mut self, pointer: Point) {
        let InteractionState::Dragging(drag) = &self.state else {
            return;
        };
        let Some(index) = self.sprites.index_of(drag.sprite) else {
            return;
        };
        let target = pointer - drag.offset;
        self.sprites.update_position(index, target.x, target.y);
    }

    /// End the drag, wherever the pointer is.
    pub fn pointer_up(&mut self) {
        self.end_drag();
    }

    fn end_drag(&mut self) {
        if let InteractionState::Dragging(drag) = std::mem::take(&mut self.state) {
            debug!(id = %drag.sprite, "drag ended");
            drag.listeners.release();
        }
    }

    // --- Keyboard and overlay controls ---

    /// Handle a global key press. Returns whether the key did anything.
    pub fn key_down(&mut self, key: Key) -> bool {
        if self.selection.is_none() {
            return false;
        }
        match key.command() {
            Some(Command::Control(action)) => {
                self.apply_control(action);
                true
            }
            Some(Command::Deselect) => {
                self.deselect();
                true
            }
            None => false,
        }
    }

    /// Apply an overlay control to the selected sprite. Controls never
    /// bubble to the canvas.
    pub fn apply_control(&mut self, action: ControlAction) -> Propagation {
        let Some(index) = self.selection else {
            return Propagation::Stop;
        };
        match action {
            ControlAction::RotateLeft => self.sprites.update_rotation(index, -self.rotation_step),
            ControlAction::RotateRight => self.sprites.update_rotation(index, self.rotation_step),
            ControlAction::ScaleUp => self.sprites.update_scale(index, self.scale_step),
            ControlAction::ScaleDown => self.sprites.update_scale(index, -self.scale_step),
            ControlAction::Delete => self.remove(index),
        }
        Propagation::Stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::subscription::testing::RecordingHost;

    fn controller() -> (InteractionController, Rc<RecordingHost>) {
        let host = Rc::new(RecordingHost::default());
        let ctl = InteractionController::new(&EditorConfig::default(), host.clone());
        (ctl, host)
    }

    #[test]
    fn test_new_registers_keyboard() {
        let (ctl, host) = controller();
        assert_eq!(host.active(ListenerKind::Keyboard), 1);
        assert_eq!(host.active(ListenerKind::Drag), 0);
        assert!(!ctl.is_dragging());
    }

    #[test]
    fn test_drop_releases_everything() {
        let (mut ctl, host) = controller();
        ctl.add_sprite();
        ctl.pointer_down(PointerTarget::Sprite(0), Point::new(260.0, 160.0));
        assert_eq!(host.active(ListenerKind::Drag), 1);

        drop(ctl);
        assert_eq!(host.detached(ListenerKind::Drag), 1);
        assert_eq!(host.detached(ListenerKind::Keyboard), 1);
    }

    #[test]
    fn test_add_does_not_select() {
        let (mut ctl, _) = controller();
        ctl.add_sprite();
        assert_eq!(ctl.selection(), None);
    }

    #[test]
    fn test_sprite_press_selects_and_drags() {
        let (mut ctl, host) = controller();
        ctl.add_sprite();
        ctl.add_sprite();

        let prop = ctl.pointer_down(PointerTarget::Sprite(1), Point::new(260.0, 170.0));
        assert_eq!(prop, Propagation::Stop);
        assert_eq!(ctl.selection(), Some(1));
        assert!(ctl.is_dragging());
        assert_eq!(ctl.dragging_index(), Some(1));
        assert_eq!(host.active(ListenerKind::Drag), 1);

        match ctl.state() {
            InteractionState::Dragging(drag) => {
                assert_eq!(drag.offset, Point::new(10.0, 20.0));
            }
            InteractionState::Idle => panic!("expected drag"),
        }
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let (mut ctl, _) = controller();
        ctl.add_sprite();

        ctl.pointer_down(PointerTarget::Sprite(0), Point::new(260.0, 160.0));
        ctl.pointer_move(Point::new(310.0, 210.0));
        assert_eq!(ctl.sprites().get(0).unwrap().position, Point::new(300.0, 200.0));
    }

    #[test]
    fn test_drag_clamps_to_safe_area() {
        let (mut ctl, _) = controller();
        ctl.add_sprite();

        ctl.pointer_down(PointerTarget::Sprite(0), Point::new(250.0, 150.0));
        ctl.pointer_move(Point::new(-400.0, 9000.0));
        assert_eq!(ctl.sprites().get(0).unwrap().position, Point::new(50.0, 375.0));
    }

    #[test]
    fn test_move_while_idle_does_nothing() {
        let (mut ctl, _) = controller();
        ctl.add_sprite();
        ctl.pointer_move(Point::new(400.0, 300.0));
        assert_eq!(ctl.sprites().get(0).unwrap().position, Point::new(250.0, 150.0));
    }

    #[test]
    fn test_pointer_up_ends_drag_once() {
        let (mut ctl, host) = controller();
        ctl.add_sprite();

        ctl.pointer_down(PointerTarget::Sprite(0), Point::new(250.0, 150.0));
        ctl.pointer_up();
        ctl.pointer_up();

        assert!(!ctl.is_dragging());
        assert_eq!(host.attached(ListenerKind::Drag), 1);
        assert_eq!(host.detached(ListenerKind::Drag), 1);

        // Selection survives the end of the drag
        assert_eq!(ctl.selection(), Some(0));

        ctl.pointer_move(Point::new(400.0, 300.0));
        assert_eq!(ctl.sprites().get(0).unwrap().position, Point::new(250.0, 150.0));
    }

    #[test]
    fn test_regrab_releases_previous_drag_first() {
        let (mut ctl, host) = controller();
        ctl.add_sprite();
        ctl.add_sprite();

        ctl.pointer_down(PointerTarget::Sprite(0), Point::new(250.0, 150.0));
        ctl.pointer_down(PointerTarget::Sprite(1), Point::new(250.0, 150.0));
        assert_eq!(host.active(ListenerKind::Drag), 1);
        assert_eq!(ctl.dragging_index(), Some(1));
    }

    #[test]
    fn test_canvas_press_deselects() {
        let (mut ctl, _) = controller();
        ctl.add_sprite();
        ctl.pointer_down(PointerTarget::Sprite(0), Point::new(250.0, 150.0));
        ctl.pointer_up();

        let prop = ctl.pointer_down(PointerTarget::Canvas, Point::new(10.0, 10.0));
        assert_eq!(prop, Propagation::Continue);
        assert_eq!(ctl.selection(), None);
    }

    #[test]
    fn test_outside_press_keeps_selection() {
        let (mut ctl, _) = controller();
        ctl.add_sprite();
        ctl.pointer_down(PointerTarget::Sprite(0), Point::new(250.0, 150.0));
        ctl.pointer_up();

        ctl.pointer_down(PointerTarget::Outside, Point::new(900.0, 900.0));
        assert_eq!(ctl.selection(), Some(0));
    }

    #[test]
    fn test_press_on_missing_sprite_falls_through() {
        let (mut ctl, host) = controller();
        let prop = ctl.pointer_down(PointerTarget::Sprite(3), Point::new(0.0, 0.0));
        assert_eq!(prop, Propagation::Continue);
        assert!(!ctl.is_dragging());
        assert_eq!(host.attached(ListenerKind::Drag), 0);
    }

    #[test]
    fn test_keys_ignored_without_selection() {
        let (mut ctl, _) = controller();
        ctl.add_sprite();
        assert!(!ctl.key_down(Key::ArrowRight));
        assert!(!ctl.key_down(Key::Delete));
        assert_eq!(ctl.sprites().len(), 1);
        assert_eq!(ctl.sprites().get(0).unwrap().rotation_degrees, 0.0);
    }

    #[test]
    fn test_key_bindings_mutate_selected() {
        let (mut ctl, _) = controller();
        ctl.add_sprite();
        ctl.add_sprite();
        ctl.pointer_down(PointerTarget::Sprite(1), Point::new(250.0, 150.0));
        ctl.pointer_up();

        assert!(ctl.key_down(Key::ArrowRight));
        assert_eq!(ctl.sprites().get(1).unwrap().rotation_degrees, 5.0);

        assert!(ctl.key_down(Key::ArrowLeft));
        assert!(ctl.key_down(Key::ArrowLeft));
        assert_eq!(ctl.sprites().get(1).unwrap().rotation_degrees, 355.0);

        assert!(ctl.key_down(Key::Plus));
        assert!((ctl.sprites().get(1).unwrap().scale - 4.1).abs() < 1e-9);
        assert!(ctl.key_down(Key::Equals));
        assert!(ctl.key_down(Key::Minus));
        assert!((ctl.sprites().get(1).unwrap().scale - 4.1).abs() < 1e-9);

        // Unselected sprite untouched
        assert_eq!(ctl.sprites().get(0).unwrap().rotation_degrees, 0.0);
        assert_eq!(ctl.sprites().get(0).unwrap().scale, 4.0);

        assert!(!ctl.key_down(Key::Other));
    }

    #[test]
    fn test_escape_clears_selection() {
        let (mut ctl, _) = controller();
        ctl.add_sprite();
        ctl.pointer_down(PointerTarget::Sprite(0), Point::new(250.0, 150.0));
        assert!(ctl.key_down(Key::Escape));
        assert_eq!(ctl.selection(), None);
        assert_eq!(ctl.sprites().len(), 1);
    }

    #[test]
    fn test_delete_key_removes_selected_and_clears_selection() {
        let (mut ctl, _) = controller();
        let keep = ctl.add_sprite();
        ctl.add_sprite();
        ctl.pointer_down(PointerTarget::Sprite(1), Point::new(250.0, 150.0));
        ctl.pointer_up();

        assert!(ctl.key_down(Key::Backspace));
        assert_eq!(ctl.sprites().len(), 1);
        assert_eq!(ctl.sprites().get(0).unwrap().id, keep);
        assert_eq!(ctl.selection(), None);
    }

    #[test]
    fn test_removing_unselected_sprite_clears_selection() {
        let (mut ctl, _) = controller();
        ctl.add_sprite();
        ctl.add_sprite();
        ctl.pointer_down(PointerTarget::Sprite(1), Point::new(250.0, 150.0));
        ctl.pointer_up();

        ctl.remove(0);
        assert_eq!(ctl.selection(), None);
    }

    #[test]
    fn test_deleting_dragged_sprite_ends_drag() {
        let (mut ctl, host) = controller();
        ctl.add_sprite();
        ctl.pointer_down(PointerTarget::Sprite(0), Point::new(250.0, 150.0));

        assert!(ctl.key_down(Key::Delete));
        assert!(!ctl.is_dragging());
        assert_eq!(host.active(ListenerKind::Drag), 0);

        ctl.pointer_up();
        assert_eq!(host.detached(ListenerKind::Drag), 1);
    }

    #[test]
    fn test_removing_other_sprite_ends_drag() {
        let (mut ctl, host) = controller();
        let first = ctl.add_sprite();
        ctl.add_sprite();
        ctl.pointer_down(PointerTarget::Sprite(1), Point::new(250.0, 150.0));

        ctl.remove(0);
        assert!(!ctl.is_dragging());
        assert_eq!(host.active(ListenerKind::Drag), 0);

        ctl.pointer_move(Point::new(300.0, 200.0));
        assert_eq!(ctl.sprites().get(0).unwrap().position, Point::new(250.0, 150.0));
        assert_ne!(ctl.sprites().get(0).unwrap().id, first);
    }

    #[test]
    fn test_escape_during_drag_stops_following() {
        let (mut ctl, host) = controller();
        ctl.add_sprite();
        ctl.pointer_down(PointerTarget::Sprite(0), Point::new(250.0, 150.0));

        assert!(ctl.key_down(Key::Escape));
        assert!(!ctl.is_dragging());
        assert_eq!(ctl.dragging_index(), None);
        assert_eq!(host.active(ListenerKind::Drag), 0);

        ctl.pointer_move(Point::new(300.0, 200.0));
        assert_eq!(ctl.sprites().get(0).unwrap().position, Point::new(250.0, 150.0));

        ctl.pointer_up();
        assert_eq!(host.detached(ListenerKind::Drag), 1);
    }

    #[test]
    fn test_canvas_press_during_drag_ends_it() {
        let (mut ctl, host) = controller();
        ctl.add_sprite();
        ctl.pointer_down(PointerTarget::Sprite(0), Point::new(250.0, 150.0));

        ctl.canvas_pointer_down(PointerTarget::Canvas);
        assert_eq!(ctl.selection(), None);
        assert!(!ctl.is_dragging());
        assert_eq!(host.active(ListenerKind::Drag), 0);
    }

    #[test]
    fn test_controls_apply_to_selection() {
        let (mut ctl, _) = controller();
        ctl.add_sprite();
        ctl.pointer_down(PointerTarget::Sprite(0), Point::new(250.0, 150.0));
        ctl.pointer_up();

        assert_eq!(ctl.apply_control(ControlAction::RotateLeft), Propagation::Stop);
        assert_eq!(ctl.sprites().get(0).unwrap().rotation_degrees, 355.0);

        ctl.apply_control(ControlAction::ScaleDown);
        assert!((ctl.sprites().get(0).unwrap().scale - 3.9).abs() < 1e-9);

        ctl.apply_control(ControlAction::Delete);
        assert!(ctl.sprites().is_empty());
        assert_eq!(ctl.selection(), None);
    }

    #[test]
    fn test_controls_without_selection_are_noops() {
        let (mut ctl, _) = controller();
        ctl.add_sprite();
        ctl.apply_control(ControlAction::Delete);
        assert_eq!(ctl.sprites().len(), 1);
    }

    #[test]
    fn test_eighteen_left_turns_from_keyboard() {
        let (mut ctl, _) = controller();
        ctl.add_sprite();
        ctl.pointer_down(PointerTarget::Sprite(0), Point::new(250.0, 150.0));
        ctl.pointer_up();
        for _ in 0..18 {
            ctl.key_down(Key::ArrowLeft);
        }
        assert_eq!(ctl.sprites().get(0).unwrap().rotation_degrees, 270.0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let (mut ctl, host) = controller();
        ctl.add_sprite();
        ctl.pointer_down(PointerTarget::Sprite(0), Point::new(250.0, 150.0));

        ctl.reset();
        assert!(ctl.sprites().is_empty());
        assert_eq!(ctl.selection(), None);
        assert!(!ctl.is_dragging());
        assert_eq!(host.active(ListenerKind::Drag), 0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::interaction::subscription::testing::RecordingHost;
    use proptest::prelude::*;

    proptest! {
        /// Property: every position reachable by dragging lies in the safe area.
        #[test]
        fn prop_drag_stays_in_safe_area(
            grab in (0.0f64..500.0, 0.0f64..400.0),
            path in prop::collection::vec((-2000.0f64..2000.0, -2000.0f64..2000.0), 1..32),
        ) {
            let host = Rc::new(RecordingHost::default());
            let mut ctl = InteractionController::new(&EditorConfig::default(), host);
            ctl.add_sprite();
            ctl.pointer_down(PointerTarget::Sprite(0), Point::new(grab.0, grab.1));
            for (x, y) in path {
                ctl.pointer_move(Point::new(x, y));
                let p = ctl.sprites().get(0).unwrap().position;
                prop_assert!((50.0..=450.0).contains(&p.x), "x {} escaped", p.x);
                prop_assert!((25.0..=375.0).contains(&p.y), "y {} escaped", p.y);
            }
        }

        /// Property: drag listeners are balanced after any press/release sequence.
        #[test]
        fn prop_drag_listeners_balanced(presses in prop::collection::vec(0usize..4, 0..16)) {
            let host = Rc::new(RecordingHost::default());
            let mut ctl = InteractionController::new(&EditorConfig::default(), host.clone());
            ctl.add_sprite();
            ctl.add_sprite();
            for target in presses {
                ctl.pointer_down(PointerTarget::Sprite(target), Point::new(250.0, 150.0));
                prop_assert!(host.active(ListenerKind::Drag) <= 1);
            }
            ctl.pointer_up();
            prop_assert_eq!(host.active(ListenerKind::Drag), 0);
        }

        /// Property: the dragged sprite is always the selected one.
        #[test]
        fn prop_drag_implies_selection(ops in prop::collection::vec(0u8..6, 0..24)) {
            let host = Rc::new(RecordingHost::default());
            let mut ctl = InteractionController::new(&EditorConfig::default(), host.clone());
            ctl.add_sprite();
            ctl.add_sprite();
            for op in ops {
                let at = Point::new(250.0, 150.0);
                match op {
                    0 | 1 => {
                        ctl.pointer_down(PointerTarget::Sprite(usize::from(op)), at);
                    }
                    2 => {
                        ctl.key_down(Key::Escape);
                    }
                    3 => {
                        ctl.key_down(Key::Delete);
                    }
                    4 => {
                        ctl.pointer_down(PointerTarget::Canvas, at);
                    }
                    _ => {
                        ctl.add_sprite();
                    }
                }
                if let Some(index) = ctl.dragging_index() {
                    prop_assert_eq!(ctl.selection(), Some(index));
                }
                prop_assert_eq!(host.active(ListenerKind::Drag), usize::from(ctl.is_dragging()));
            }
        }
    }
}
