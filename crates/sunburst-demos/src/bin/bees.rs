//! Sprite stress test: thousands of textured quads bouncing around the window.
//!
//! Usage: `bees [count] [size_px] [vsync] [texture.png]`
//!
//! Keys: V toggles vsync, B doubles the swarm (up to 4x the start count),
//! N halves it, ESC quits.

use std::f32::consts::TAU;

use anyhow::Result;
use rand::Rng;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::keyboard::KeyCode;
use winit::window::WindowId;

use sunburst_demos::assets;
use sunburst_demos::input::InputTracker;
use sunburst_engine::coords::Color;
use sunburst_engine::core::{App, AppControl, FrameCtx};
use sunburst_engine::device::GpuInit;
use sunburst_engine::logging::{init_logging, LoggingConfig};
use sunburst_engine::render::{RendererConfig, Texture};
use sunburst_engine::time::FrameRateCounter;
use sunburst_engine::window::{Runtime, RuntimeConfig};

const DEFAULT_COUNT: usize = 10_000;
const DEFAULT_SIZE_PX: i32 = 32;
const DEFAULT_TEXTURE: &str = "bee.png";

/// Fixed simulation step (120 Hz).
const SIM_DT: f32 = 1.0 / 120.0;
const SPEED_MIN: f32 = 40.0;
const SPEED_MAX: f32 = 240.0;

#[derive(Debug, Clone, PartialEq)]
struct Args {
    count: usize,
    size_px: i32,
    vsync: bool,
    texture: String,
}

impl Args {
    /// Positional arguments; anything missing or unparsable keeps its default.
    fn parse(mut args: impl Iterator<Item = String>) -> Self {
        let count = args
            .next()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_COUNT);
        let size_px = args
            .next()
            .and_then(|s| s.parse::<i32>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_SIZE_PX);
        let vsync = args.next().is_some_and(|s| s == "1");
        let texture = args.next().unwrap_or_else(|| DEFAULT_TEXTURE.to_string());

        Self { count, size_px, vsync, texture }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Bee {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    /// Uniform scale applied to the sprite size.
    s: f32,
}

impl Bee {
    fn random(rng: &mut impl Rng, size_px: f32, field: (f32, f32)) -> Self {
        let s = rng.random_range(0.75..1.5);
        let extent = size_px * s;
        let speed = rng.random_range(SPEED_MIN..SPEED_MAX);
        let angle = rng.random_range(0.0..TAU);

        Self {
            x: rng.random_range(0.0..=(field.0 - extent).max(0.0)),
            y: rng.random_range(0.0..=(field.1 - extent).max(0.0)),
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            s,
        }
    }
}

/// Advances every bee by `dt`, bouncing off the field edges.
fn step(bees: &mut [Bee], size_px: f32, field: (f32, f32), dt: f32) {
    for b in bees {
        let extent = size_px * b.s;

        b.x += b.vx * dt;
        b.y += b.vy * dt;

        if b.x < 0.0 {
            b.x = 0.0;
            b.vx = -b.vx;
        }
        if b.y < 0.0 {
            b.y = 0.0;
            b.vy = -b.vy;
        }
        if b.x + extent > field.0 {
            b.x = field.0 - extent;
            b.vx = -b.vx;
        }
        if b.y + extent > field.1 {
            b.y = field.1 - extent;
            b.vy = -b.vy;
        }
    }
}

struct Bees {
    args: Args,
    /// Live bees; never more than `cap`.
    bees: Vec<Bee>,
    cap: usize,
    texture: Option<Texture>,

    input: InputTracker,
    vsync: bool,
    field: (f32, f32),

    sim_acc: f32,
    hud_acc: f32,
    fps: FrameRateCounter,
}

impl Bees {
    fn new(args: Args) -> Self {
        let cap = args.count.saturating_mul(4);
        Self {
            vsync: args.vsync,
            bees: Vec::with_capacity(cap),
            cap,
            args,
            texture: None,
            input: InputTracker::default(),
            field: (0.0, 0.0),
            sim_acc: 0.0,
            hud_acc: 0.0,
            fps: FrameRateCounter::new(),
        }
    }

    fn spawn_to(&mut self, target: usize) {
        let target = target.min(self.cap);
        let mut rng = rand::rng();
        let size_px = self.args.size_px as f32;
        while self.bees.len() < target {
            self.bees.push(Bee::random(&mut rng, size_px, self.field));
        }
        log::info!("bees: {} (cap {})", self.bees.len(), self.cap);
    }

    fn shrink_to(&mut self, target: usize) {
        self.bees.truncate(target);
        log::info!("bees: {} (cap {})", self.bees.len(), self.cap);
    }

    fn load_texture(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Texture {
        let image = match assets::load_png(&self.args.texture) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("{e:#}; using a procedural sprite");
                assets::striped_bee(self.args.size_px.max(8) as u32)
            }
        };
        let texture = ctx.renderer.load_texture(Some(image.as_decoded()));
        self.texture = Some(texture);
        texture
    }
}

impl App for Bees {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        self.input.handle(event);
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let size = ctx.window.drawable_size();
        self.field = (size.width as f32, size.height as f32);

        let texture = match self.texture {
            Some(t) => t,
            None => {
                let t = self.load_texture(ctx);
                self.spawn_to(self.args.count);
                log::info!(
                    "starting with {} bees @ {} px, vsync={}",
                    self.bees.len(),
                    self.args.size_px,
                    self.vsync
                );
                t
            }
        };

        if self.input.was_pressed(KeyCode::Escape) {
            if let Some(mut t) = self.texture.take() {
                ctx.renderer.destroy_texture(&mut t);
            }
            return AppControl::Exit;
        }
        if self.input.was_pressed(KeyCode::KeyV) {
            self.vsync = !self.vsync;
            ctx.gpu().set_vsync(self.vsync);
        }
        if self.input.was_pressed(KeyCode::KeyB) {
            self.spawn_to(self.bees.len().max(1) * 2);
        }
        if self.input.was_pressed(KeyCode::KeyN) {
            self.shrink_to(self.bees.len() / 2);
        }
        self.input.end_frame();

        self.sim_acc += ctx.time.dt;
        while self.sim_acc >= SIM_DT {
            step(&mut self.bees, self.args.size_px as f32, self.field, SIM_DT);
            self.sim_acc -= SIM_DT;
        }

        let size_px = self.args.size_px as f32;
        let bees = &self.bees;
        ctx.draw_2d(Some(Color::BACKGROUND), |r| {
            for b in bees {
                let extent = (size_px * b.s) as i32;
                r.draw_texture(&texture, b.x as i32, b.y as i32, extent, extent, true);
            }
        });

        self.fps.frame();
        self.hud_acc += ctx.time.dt;
        if self.hud_acc >= 1.0 {
            let stats = ctx.renderer.stats();
            log::info!(
                "bees={} tex={}x{} fb={}x{} vsync={} draws={}",
                self.bees.len(),
                texture.width(),
                texture.height(),
                size.width,
                size.height,
                self.vsync,
                stats.draw_calls
            );
            self.hud_acc -= 1.0;
        }

        AppControl::Continue
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let args = Args::parse(std::env::args().skip(1));
    let gpu_init = GpuInit {
        vsync: args.vsync,
        ..GpuInit::default()
    };

    Runtime::run(
        RuntimeConfig {
            title: "Sunburst Stress Test - Bees".to_string(),
            initial_size: LogicalSize::new(1600.0, 900.0),
            ..RuntimeConfig::default()
        },
        gpu_init,
        RendererConfig::default(),
        Bees::new(args),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Args {
        Args::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_when_no_arguments() {
        let a = args(&[]);
        assert_eq!(a.count, DEFAULT_COUNT);
        assert_eq!(a.size_px, DEFAULT_SIZE_PX);
        assert!(!a.vsync);
        assert_eq!(a.texture, DEFAULT_TEXTURE);
    }

    #[test]
    fn invalid_values_fall_back() {
        let a = args(&["-5", "abc", "7"]);
        assert_eq!(a.count, DEFAULT_COUNT);
        assert_eq!(a.size_px, DEFAULT_SIZE_PX);
        assert!(!a.vsync);

        let b = args(&["500", "16", "1", "sprite.png"]);
        assert_eq!((b.count, b.size_px, b.vsync), (500, 16, true));
        assert_eq!(b.texture, "sprite.png");
    }

    #[test]
    fn bees_bounce_off_edges() {
        let mut bees = [Bee { x: 95.0, y: 1.0, vx: 100.0, vy: -200.0, s: 1.0 }];
        step(&mut bees, 10.0, (100.0, 100.0), 0.1);

        assert_eq!(bees[0].x, 90.0);
        assert_eq!(bees[0].vx, -100.0);
        assert_eq!(bees[0].y, 0.0);
        assert_eq!(bees[0].vy, 200.0);
    }

    #[test]
    fn spawned_bees_fit_the_field() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let b = Bee::random(&mut rng, 32.0, (200.0, 100.0));
            assert!(b.x >= 0.0 && b.x + 32.0 * b.s <= 200.0 + 1e-3);
            assert!(b.y >= 0.0 && b.y + 32.0 * b.s <= 100.0 + 1e-3);
        }
    }

    #[test]
    fn swarm_is_capped() {
        let mut app = Bees::new(args(&["10"]));
        app.field = (800.0, 600.0);
        app.spawn_to(1000);
        assert_eq!(app.bees.len(), 40);
        app.shrink_to(5);
        assert_eq!(app.bees.len(), 5);
    }
}
