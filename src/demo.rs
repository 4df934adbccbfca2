//! The sprite test scene: one character that idles, attacks and walks.

use bitflags::bitflags;
use glam::IVec2;

use crate::{
    config::{AnimationConfig, DemoConfig},
    engine::{Engine, Scene},
    errors::Error,
    input::{ActionId, KeyCode},
    sprite::AnimatedSprite,
};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up = 1,
    Down,
    Left,
    Right,
    Attack,
    Idle,
    Quit,
}

impl From<Action> for ActionId {
    fn from(value: Action) -> Self {
        ActionId(value as u8)
    }
}

bitflags! {
    /// Arrow keys currently held
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Heading: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

impl Heading {
    /// Held directions for this frame
    pub fn from_input(eng: &Engine) -> Self {
        let input = eng.input();
        let mut heading = Heading::empty();
        for (action, flag) in [
            (Action::Up, Heading::UP),
            (Action::Down, Heading::DOWN),
            (Action::Left, Heading::LEFT),
            (Action::Right, Heading::RIGHT),
        ] {
            heading.set(flag, input.pressed(&action.into()));
        }
        heading
    }

    /// Movement for one tick. Opposite directions cancel out.
    pub fn velocity(self, speed: i32) -> IVec2 {
        let mut v = IVec2::ZERO;
        if self.contains(Heading::UP) {
            v.y -= speed;
        }
        if self.contains(Heading::DOWN) {
            v.y += speed;
        }
        if self.contains(Heading::LEFT) {
            v.x -= speed;
        }
        if self.contains(Heading::RIGHT) {
            v.x += speed;
        }
        v
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Attacking,
}

pub struct SpriteDemo {
    config: DemoConfig,
    sprite: AnimatedSprite,
    phase: Phase,
    pos: IVec2,
    // set by the last advance, read on the next update
    cycle_done: bool,
}

impl SpriteDemo {
    pub fn new(config: DemoConfig) -> Self {
        Self {
            config,
            sprite: AnimatedSprite::new(),
            phase: Phase::Idle,
            pos: IVec2::ZERO,
            cycle_done: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pos(&self) -> IVec2 {
        self.pos
    }

    pub fn sprite(&self) -> &AnimatedSprite {
        &self.sprite
    }

    fn load(&mut self, eng: &mut Engine, animation: &AnimationConfig) -> Result<(), Error> {
        self.sprite.load(eng, &animation.path, animation.layout)
    }

    fn enter_attack(&mut self, eng: &mut Engine) {
        let attack = self.config.attack.clone();
        match self.load(eng, &attack) {
            Ok(()) => {
                self.phase = Phase::Attacking;
                self.pos += self.config.attack_offset;
                self.cycle_done = false;
            }
            Err(err) => log::error!("Failed to start attack: {err}"),
        }
    }

    fn enter_idle(&mut self, eng: &mut Engine) {
        let idle = self.config.idle.clone();
        match self.load(eng, &idle) {
            Ok(()) => {
                self.phase = Phase::Idle;
                self.pos -= self.config.attack_offset;
            }
            Err(err) => log::error!("Failed to return to idle: {err}"),
        }
    }
}

impl Scene for SpriteDemo {
    fn init(&mut self, eng: &mut Engine) -> Result<(), Error> {
        let input = eng.input_mut();
        input.bind(KeyCode::Up, Action::Up.into());
        input.bind(KeyCode::Down, Action::Down.into());
        input.bind(KeyCode::Left, Action::Left.into());
        input.bind(KeyCode::Right, Action::Right.into());
        input.bind(KeyCode::KeyA, Action::Attack.into());
        input.bind(KeyCode::KeyI, Action::Idle.into());
        input.bind(KeyCode::Escape, Action::Quit.into());

        let idle = self.config.idle.clone();
        self.load(eng, &idle)?;
        self.phase = Phase::Idle;
        self.pos = self.sprite.center_position(eng.view_size());
        Ok(())
    }

    fn update(&mut self, eng: &mut Engine) {
        if eng.input().just_pressed(&Action::Quit.into()) {
            eng.quit();
            return;
        }

        match self.phase {
            Phase::Idle if eng.input().just_pressed(&Action::Attack.into()) => {
                self.enter_attack(eng)
            }
            Phase::Attacking if eng.input().just_pressed(&Action::Idle.into()) => {
                self.enter_idle(eng)
            }
            _ => {}
        }

        self.pos += Heading::from_input(eng).velocity(self.config.movement_speed);

        if self.phase == Phase::Attacking && self.cycle_done {
            self.enter_idle(eng);
        }
    }

    fn draw(&mut self, eng: &mut Engine) {
        self.sprite.render(eng, self.pos);
        // the animation advances once per rendered frame
        self.cycle_done = self.sprite.advance();
    }

    fn cleanup(&mut self, _eng: &mut Engine) {
        self.sprite.release();
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, path::Path, rc::Rc};

    use glam::UVec2;

    use super::*;
    use crate::{
        input::KeyState,
        platform::headless::{HeadlessPlatform, Recording},
        testing::{fixture_dir, write_sheet},
    };

    // idle cell 40x50, attack cell 100x60
    fn setup(name: &str) -> (Engine, Rc<RefCell<Recording>>, SpriteDemo) {
        let dir = fixture_dir(name);
        let config = DemoConfig::default();
        write_sheet(&dir, path_str(&config.idle.path), UVec2::new(120, 100));
        write_sheet(&dir, path_str(&config.attack.path), UVec2::new(300, 480));

        let platform = HeadlessPlatform::new();
        let recording = platform.recording();
        let mut eng = Engine::new(Box::new(platform), UVec2::new(640, 480), &dir);
        let mut demo = SpriteDemo::new(config);
        demo.init(&mut eng).unwrap();
        (eng, recording, demo)
    }

    fn path_str(path: &Path) -> &str {
        path.to_str().unwrap()
    }

    fn key(eng: &mut Engine, code: KeyCode, down: bool) {
        let state = if down {
            KeyState::down()
        } else {
            KeyState::up()
        };
        eng.input.set_input_state(code, state);
    }

    #[test]
    fn test_heading_velocity() {
        assert_eq!(Heading::empty().velocity(4), IVec2::ZERO);
        assert_eq!((Heading::UP | Heading::LEFT).velocity(4), IVec2::new(-4, -4));
        assert_eq!((Heading::UP | Heading::DOWN).velocity(4), IVec2::ZERO);
        assert_eq!(
            (Heading::RIGHT | Heading::DOWN).velocity(3),
            IVec2::new(3, 3)
        );
    }

    #[test]
    fn test_starts_idle_and_centered() {
        let (mut eng, recording, mut demo) = setup("demo-start");
        assert_eq!(demo.phase(), Phase::Idle);
        assert_eq!(demo.pos(), IVec2::new(300, 215));

        eng.step(&mut demo);
        let rec = recording.borrow();
        assert_eq!(rec.draws.len(), 1);
        assert_eq!(
            rec.draws[0].dst.pos,
            IVec2::new(300, 215),
            "drawn where it stands"
        );
        assert_eq!(demo.sprite().current_tick(), 1);
    }

    #[test]
    fn test_arrow_keys_move_while_held() {
        let (mut eng, _, mut demo) = setup("demo-move");
        let start = demo.pos();

        key(&mut eng, KeyCode::Right, true);
        key(&mut eng, KeyCode::Up, true);
        for _ in 0..3 {
            eng.step(&mut demo);
        }
        assert_eq!(demo.pos(), start + IVec2::new(12, -12));

        key(&mut eng, KeyCode::Up, false);
        key(&mut eng, KeyCode::Down, true);
        key(&mut eng, KeyCode::Up, true);
        eng.step(&mut demo);
        assert_eq!(demo.pos(), start + IVec2::new(16, -12));

        key(&mut eng, KeyCode::Right, false);
        key(&mut eng, KeyCode::Up, false);
        key(&mut eng, KeyCode::Down, false);
        eng.step(&mut demo);
        assert_eq!(demo.pos(), start + IVec2::new(16, -12));
    }

    #[test]
    fn test_attack_runs_one_cycle_then_idles() {
        let (mut eng, recording, mut demo) = setup("demo-attack");
        let start = demo.pos();
        let cycle = DemoConfig::default().attack.layout.cycle_ticks();

        key(&mut eng, KeyCode::KeyA, true);
        eng.step(&mut demo);
        key(&mut eng, KeyCode::KeyA, false);
        assert_eq!(demo.phase(), Phase::Attacking);
        assert_eq!(demo.pos(), start + IVec2::new(-154, -17));
        assert_eq!(demo.sprite().cell_size(), UVec2::new(100, 60));

        // pressing attack again mid-attack does nothing
        key(&mut eng, KeyCode::KeyA, true);
        eng.step(&mut demo);
        key(&mut eng, KeyCode::KeyA, false);
        assert_eq!(demo.sprite().current_tick(), 2);

        for _ in 2..cycle {
            eng.step(&mut demo);
            assert_eq!(demo.phase(), Phase::Attacking);
        }
        eng.step(&mut demo);
        assert_eq!(demo.phase(), Phase::Idle);
        assert_eq!(demo.pos(), start);
        assert_eq!(demo.sprite().cell_size(), UVec2::new(40, 50));

        // the attack sheet was given back
        eng.step(&mut demo);
        assert_eq!(recording.borrow().textures.len(), 1);
        assert_eq!(eng.live_textures(), 1);
    }

    #[test]
    fn test_idle_key_cancels_attack() {
        let (mut eng, _, mut demo) = setup("demo-cancel");
        let start = demo.pos();

        key(&mut eng, KeyCode::KeyA, true);
        eng.step(&mut demo);
        key(&mut eng, KeyCode::KeyA, false);
        eng.step(&mut demo);
        assert_eq!(demo.phase(), Phase::Attacking);

        key(&mut eng, KeyCode::KeyI, true);
        eng.step(&mut demo);
        assert_eq!(demo.phase(), Phase::Idle);
        assert_eq!(demo.pos(), start);
    }

    #[test]
    fn test_missing_attack_sheet_stays_idle() {
        let (mut eng, _, mut demo) = setup("demo-missing-attack");
        demo.config.attack.path = "nope.png".into();
        let start = demo.pos();

        key(&mut eng, KeyCode::KeyA, true);
        eng.step(&mut demo);
        assert_eq!(demo.phase(), Phase::Idle);
        assert_eq!(demo.pos(), start);
        assert!(demo.sprite().is_loaded());
    }

    #[test]
    fn test_escape_quits() {
        let (mut eng, _, mut demo) = setup("demo-quit");
        key(&mut eng, KeyCode::Escape, true);
        eng.step(&mut demo);
        assert!(eng.wants_to_exit());
    }

    #[test]
    fn test_init_fails_without_idle_sheet() {
        let dir = fixture_dir("demo-no-assets");
        let platform = HeadlessPlatform::new();
        let mut eng = Engine::new(Box::new(platform), UVec2::new(640, 480), &dir);
        eng.set_scene(SpriteDemo::new(DemoConfig::default()));
        assert!(matches!(eng.init(), Err(Error::Decode { .. })));
    }
}
