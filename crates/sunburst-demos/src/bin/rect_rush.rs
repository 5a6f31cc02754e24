//! Rect Rush: a small arcade game drawn entirely with solid rectangles.
//!
//! WASD moves, left click shoots toward the cursor, the mouse wheel resizes
//! the player (and its hitbox), R restarts after death, ESC quits.

use anyhow::Result;
use rand::Rng;
use winit::dpi::LogicalSize;
use winit::event::{MouseButton, WindowEvent};
use winit::keyboard::KeyCode;
use winit::window::WindowId;

use sunburst_demos::input::InputTracker;
use sunburst_engine::coords::{Color, Rect, Vec2};
use sunburst_engine::core::{App, AppControl, FrameCtx};
use sunburst_engine::device::GpuInit;
use sunburst_engine::logging::{init_logging, LoggingConfig};
use sunburst_engine::render::{GpuBackend, Renderer, RendererConfig};
use sunburst_engine::time::FrameRateCounter;
use sunburst_engine::window::{Runtime, RuntimeConfig};

const MAX_ENEMIES: usize = 64;
const MAX_BULLETS: usize = 128;
const PLAYER_BASE: f32 = 28.0;
const PLAYER_MIN: f32 = 12.0;
const BULLET_SIZE: f32 = 6.0;
const ENEMY_MIN_SIZE: f32 = 18.0;
const ENEMY_MAX_SIZE: f32 = 48.0;
/// Enemies smaller than this on either axis die.
const ENEMY_KILL_SIZE: f32 = 12.0;

// Speeds in pixels per 60 Hz tick; scaled by frame time.
const PLAYER_SPEED: f32 = 6.0;
const BULLET_SPEED: f32 = 12.0;
const ENEMY_MIN_SPEED: f32 = 1.5;
const ENEMY_MAX_SPEED: f32 = 3.5;

const COL_BG: Color = Color::new(0.07, 0.07, 0.10, 1.0);
const COL_TEXT: Color = Color::new(0.95, 0.95, 0.98, 1.0);
const COL_PLAYER: Color = Color::new(0.20, 0.75, 0.30, 1.0);
const COL_ENEMY: Color = Color::new(0.85, 0.20, 0.20, 1.0);
const COL_BULLET: Color = Color::new(0.95, 0.80, 0.10, 1.0);
const COL_HIT: Color = Color::new(1.00, 0.45, 0.15, 1.0);
const COL_WAVE: Color = Color::new(0.6, 0.8, 1.0, 1.0);
const COL_PANEL: Color = Color::new(0.08, 0.08, 0.12, 0.95);

fn wave_size(wave: u32) -> usize {
    6 + wave as usize * 3
}

#[derive(Debug, Copy, Clone)]
struct Mover {
    rect: Rect,
    vel: Vec2,
    alive: bool,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum State {
    Playing,
    Dead,
}

/// One frame of player intent.
#[derive(Debug, Default, Clone, Copy)]
struct Controls {
    dir: Vec2,
    shoot_at: Option<Vec2>,
    wheel: f32,
    restart: bool,
}

impl Controls {
    fn read(input: &InputTracker) -> Self {
        let axis = |neg: KeyCode, pos: KeyCode| {
            input.is_down(pos) as i32 as f32 - input.is_down(neg) as i32 as f32
        };
        Self {
            dir: Vec2::new(axis(KeyCode::KeyA, KeyCode::KeyD), axis(KeyCode::KeyW, KeyCode::KeyS)),
            shoot_at: input
                .was_clicked(MouseButton::Left)
                .then(|| input.cursor())
                .flatten()
                .map(|(x, y)| Vec2::new(x, y)),
            wheel: input.wheel(),
            restart: input.was_pressed(KeyCode::KeyR),
        }
    }
}

fn fill<B: GpuBackend>(r: &mut Renderer<B>, rect: Rect, color: Color) {
    r.draw_rectangle(
        rect.x as i32,
        rect.y as i32,
        rect.width as i32,
        rect.height as i32,
        color,
    );
}

fn center(r: Rect) -> Vec2 {
    let (x, y) = r.center();
    Vec2::new(x, y)
}

struct Game {
    player: Rect,
    enemies: Vec<Mover>,
    bullets: Vec<Mover>,
    wave: u32,
    score: u32,
    state: State,
    field: (f32, f32),
}

impl Game {
    fn new(field: (f32, f32), rng: &mut impl Rng) -> Self {
        let mut game = Self {
            player: Rect::default(),
            enemies: Vec::with_capacity(MAX_ENEMIES),
            bullets: Vec::with_capacity(MAX_BULLETS),
            wave: 1,
            score: 0,
            state: State::Playing,
            field,
        };
        game.reset(rng);
        game
    }

    fn reset(&mut self, rng: &mut impl Rng) {
        self.wave = 1;
        self.score = 0;
        self.state = State::Playing;
        self.enemies.clear();
        self.bullets.clear();
        self.player = Rect::new(
            self.field.0 * 0.5 - PLAYER_BASE * 0.5,
            self.field.1 * 0.5 - PLAYER_BASE * 0.5,
            PLAYER_BASE,
            PLAYER_BASE,
        );
        self.start_wave(rng);
    }

    fn start_wave(&mut self, rng: &mut impl Rng) {
        let target = wave_size(self.wave).min(MAX_ENEMIES);
        while self.enemies.len() < target {
            let enemy = self.spawn_enemy(rng);
            self.enemies.push(enemy);
        }
    }

    /// Enemy just outside a random edge, heading roughly at the player.
    fn spawn_enemy(&self, rng: &mut impl Rng) -> Mover {
        let (fw, fh) = self.field;
        let w = rng.random_range(ENEMY_MIN_SIZE..ENEMY_MAX_SIZE);
        let h = rng.random_range(ENEMY_MIN_SIZE..ENEMY_MAX_SIZE);
        let along_x = rng.random_range(0.0..=(fw - w).max(0.0));
        let along_y = rng.random_range(0.0..=(fh - h).max(0.0));

        let (x, y) = match rng.random_range(0..4) {
            0 => (along_x, -h - 4.0),
            1 => (along_x, fh + 4.0),
            2 => (-w - 4.0, along_y),
            _ => (fw + 4.0, along_y),
        };
        let rect = Rect::new(x, y, w, h);

        let mut dir = (center(self.player) - center(rect)).normalized_or_zero();
        if dir == Vec2::zero() {
            dir = Vec2::new(1.0, 0.0);
        }
        let speed = rng.random_range(ENEMY_MIN_SPEED..ENEMY_MAX_SPEED);

        Mover { rect, vel: dir * speed, alive: true }
    }

    fn shoot_toward(&mut self, target: Vec2) {
        if self.bullets.len() >= MAX_BULLETS {
            return;
        }
        let origin = center(self.player);
        let mut dir = (target - origin).normalized_or_zero();
        if dir == Vec2::zero() {
            dir = Vec2::new(1.0, 0.0);
        }
        self.bullets.push(Mover {
            rect: Rect::new(
                origin.x - BULLET_SIZE * 0.5,
                origin.y - BULLET_SIZE * 0.5,
                BULLET_SIZE,
                BULLET_SIZE,
            ),
            vel: dir * BULLET_SPEED,
            alive: true,
        });
    }

    fn resize(&mut self, field: (f32, f32)) {
        if field != self.field {
            self.field = field;
            self.player = self.player.clamped_into(field.0, field.1);
        }
    }

    /// Advances one frame; `ticks` is the frame time in 60 Hz ticks.
    fn update(&mut self, controls: Controls, ticks: f32, rng: &mut impl Rng) {
        if self.state == State::Dead {
            if controls.restart {
                self.reset(rng);
            }
            return;
        }

        let step = controls.dir.normalized_or_zero() * (PLAYER_SPEED * ticks);
        self.player.x += step.x;
        self.player.y += step.y;

        if controls.wheel != 0.0 {
            let c = center(self.player);
            let scale = 1.0 + 0.1 * controls.wheel;
            self.player.width = (self.player.width * scale).max(PLAYER_MIN);
            self.player.height = (self.player.height * scale).max(PLAYER_MIN);
            self.player.x = c.x - self.player.width * 0.5;
            self.player.y = c.y - self.player.height * 0.5;
        }

        if let Some(target) = controls.shoot_at {
            self.shoot_toward(target);
        }
        self.player = self.player.clamped_into(self.field.0, self.field.1);

        let (fw, fh) = self.field;
        for b in &mut self.bullets {
            b.rect.x += b.vel.x * ticks;
            b.rect.y += b.vel.y * ticks;
            let r = b.rect;
            if r.right() < -8.0 || r.bottom() < -8.0 || r.x > fw + 8.0 || r.y > fh + 8.0 {
                b.alive = false;
            }
        }

        for e in &mut self.enemies {
            e.rect.x += e.vel.x * ticks;
            e.rect.y += e.vel.y * ticks;

            if e.rect.x < 0.0 {
                e.rect.x = 0.0;
                e.vel.x = e.vel.x.abs();
            }
            if e.rect.y < 0.0 {
                e.rect.y = 0.0;
                e.vel.y = e.vel.y.abs();
            }
            if e.rect.right() > fw {
                e.rect.x = fw - e.rect.width;
                e.vel.x = -e.vel.x.abs();
            }
            if e.rect.bottom() > fh {
                e.rect.y = fh - e.rect.height;
                e.vel.y = -e.vel.y.abs();
            }

            if self.player.overlaps(e.rect) {
                self.state = State::Dead;
            }

            for b in self.bullets.iter_mut().filter(|b| b.alive) {
                let Some(hit) = b.rect.intersect(e.rect) else { continue };
                b.alive = false;

                let shrink = hit.width.min(hit.height) * 0.8;
                e.rect.width -= shrink;
                e.rect.height -= shrink;
                if e.rect.width < ENEMY_KILL_SIZE || e.rect.height < ENEMY_KILL_SIZE {
                    e.alive = false;
                    self.score += 10;
                    break;
                }

                // Knock the enemy away from the impact.
                if hit.width >= hit.height {
                    e.rect.y += hit.height.copysign(b.vel.y);
                } else {
                    e.rect.x += hit.width.copysign(b.vel.x);
                }
            }
        }

        self.bullets.retain(|b| b.alive);
        self.enemies.retain(|e| e.alive);

        if self.enemies.is_empty() {
            self.wave += 1;
            log::info!("wave {} (score {})", self.wave, self.score);
            self.start_wave(rng);
        }
    }

    fn draw<B: GpuBackend>(&self, r: &mut Renderer<B>) {
        fill(r, self.player, COL_PLAYER);
        for b in &self.bullets {
            fill(r, b.rect, COL_BULLET);
        }
        for e in &self.enemies {
            // Larger enemies shift toward orange.
            let t = ((e.rect.width + e.rect.height) / (ENEMY_MAX_SIZE * 2.0)).min(1.0);
            let color = Color::new(
                COL_ENEMY.r,
                COL_ENEMY.g * (0.8 + 0.2 * t),
                COL_ENEMY.b * (0.8 + 0.2 * (1.0 - t)),
                1.0,
            );
            fill(r, e.rect, color);
        }

        // HUD: score bar and one block per wave.
        let (fw, fh) = (self.field.0 as i32, self.field.1 as i32);
        let score_w = fw.min(self.score as i32 * 2 + 40);
        r.draw_rectangle(0, 0, score_w, 6, COL_TEXT);
        for i in 0..self.wave.min(12) as i32 {
            r.draw_rectangle(fw - 12 - i * 10, 2, 8, 4, COL_WAVE);
        }

        if self.state == State::Dead {
            let (w, h) = (100, 100);
            let (x, y) = (fw / 2 - w / 2, fh / 2 - h / 2);
            r.draw_rectangle(x, y, w, h, COL_PANEL);
            r.draw_rectangle(x + 12, y + 12, w - 24, h - 24, COL_HIT);
            for row in [24, 48, 72] {
                r.draw_rectangle(x + 24, y + row, w - 48, 8, COL_TEXT);
            }
        }
    }

    fn title(&self) -> String {
        let state = match self.state {
            State::Playing => "PLAY",
            State::Dead => "DEAD",
        };
        format!("Rect Rush | Score: {}  Wave: {}  [{state}]", self.score, self.wave)
    }
}

struct RectRush {
    game: Option<Game>,
    input: InputTracker,
    title: String,
    fps: FrameRateCounter,
}

impl App for RectRush {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        self.input.handle(event);
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.input.is_down(KeyCode::Escape) {
            return AppControl::Exit;
        }

        let size = ctx.window.drawable_size();
        let field = (size.width as f32, size.height as f32);
        let mut rng = rand::rng();

        let game = self.game.get_or_insert_with(|| Game::new(field, &mut rng));
        game.resize(field);
        game.update(Controls::read(&self.input), ctx.time.dt * 60.0, &mut rng);
        self.input.end_frame();

        ctx.draw_2d(Some(COL_BG), |r| game.draw(r));

        let title = game.title();
        if title != self.title {
            ctx.window.set_title(&title);
            self.title = title;
        }

        self.fps.frame();
        AppControl::Continue
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(
        RuntimeConfig {
            title: "Rect Rush".to_string(),
            initial_size: LogicalSize::new(960.0, 540.0),
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        RendererConfig::default(),
        RectRush {
            game: None,
            input: InputTracker::default(),
            title: String::new(),
            fps: FrameRateCounter::new(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        Game::new((960.0, 540.0), &mut rand::rng())
    }

    #[test]
    fn first_wave_spawns_outside_the_field() {
        let g = game();
        assert_eq!(g.enemies.len(), wave_size(1));
        for e in &g.enemies {
            let inside = Rect::new(0.0, 0.0, 960.0, 540.0);
            assert!(!inside.overlaps(e.rect));
        }
    }

    #[test]
    fn diagonal_movement_is_normalized() {
        let mut g = game();
        g.enemies.clear();
        g.enemies.push(Mover { rect: Rect::new(0.0, 0.0, 20.0, 20.0), vel: Vec2::zero(), alive: true });
        let start = g.player;

        let controls = Controls { dir: Vec2::new(1.0, 1.0), ..Controls::default() };
        g.update(controls, 1.0, &mut rand::rng());

        let moved = Vec2::new(g.player.x - start.x, g.player.y - start.y).length();
        assert!((moved - PLAYER_SPEED).abs() < 1e-3);
    }

    #[test]
    fn touching_an_enemy_kills_the_player() {
        let mut g = game();
        g.enemies.clear();
        g.enemies.push(Mover { rect: g.player, vel: Vec2::zero(), alive: true });

        g.update(Controls::default(), 1.0, &mut rand::rng());
        assert_eq!(g.state, State::Dead);

        g.update(Controls { restart: true, ..Controls::default() }, 1.0, &mut rand::rng());
        assert_eq!(g.state, State::Playing);
        assert_eq!(g.score, 0);
    }

    #[test]
    fn small_enemy_dies_to_one_bullet() {
        let mut g = game();
        g.enemies.clear();
        g.enemies.push(Mover { rect: Rect::new(100.0, 100.0, 14.0, 14.0), vel: Vec2::zero(), alive: true });
        g.enemies.push(Mover { rect: Rect::new(800.0, 400.0, 40.0, 40.0), vel: Vec2::zero(), alive: true });
        g.bullets.push(Mover { rect: Rect::new(102.0, 102.0, 6.0, 6.0), vel: Vec2::zero(), alive: true });

        g.update(Controls::default(), 1.0, &mut rand::rng());
        assert_eq!(g.score, 10);
        assert_eq!(g.enemies.len(), 1);
        assert!(g.bullets.is_empty());
    }

    #[test]
    fn clearing_a_wave_starts_the_next() {
        let mut g = game();
        g.enemies.clear();
        g.update(Controls::default(), 1.0, &mut rand::rng());
        assert_eq!(g.wave, 2);
        assert_eq!(g.enemies.len(), wave_size(2));
    }

    #[test]
    fn wheel_resizes_around_center_with_minimum() {
        let mut g = game();
        g.enemies.clear();
        g.enemies.push(Mover { rect: Rect::new(0.0, 0.0, 20.0, 20.0), vel: Vec2::zero(), alive: true });
        let before = center(g.player);

        g.update(Controls { wheel: -20.0, ..Controls::default() }, 1.0, &mut rand::rng());
        assert_eq!(g.player.width, PLAYER_MIN);
        let after = center(g.player);
        assert!((after - before).length() < 1e-3);
    }
}
