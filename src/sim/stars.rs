//! Scrolling background star field, shared by every screen

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::consts::NUM_STARS;
use crate::{Rgba, Viewport, uniform};

const STAR_SIZES: [f32; 3] = [1.0, 2.0, 3.0];
const STAR_SPEEDS: [f32; 3] = [20.0, 40.0, 60.0];
const STAR_COLORS: [Rgba; 3] = [
    Rgba::rgb(255, 255, 255),
    Rgba::rgb(200, 200, 255),
    Rgba::rgb(255, 255, 200),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    /// Radius in pixels
    pub size: f32,
    pub color: Rgba,
    /// Downward speed (pixels per second)
    pub speed: f32,
}

#[derive(Debug, Clone, Default)]
pub struct StarField {
    stars: Vec<Star>,
}

impl StarField {
    pub fn new<R: Rng + ?Sized>(viewport: &Viewport, rng: &mut R) -> Self {
        Self::with_count(NUM_STARS, viewport, rng)
    }

    pub fn with_count<R: Rng + ?Sized>(count: usize, viewport: &Viewport, rng: &mut R) -> Self {
        let stars = (0..count)
            .map(|_| Star {
                pos: Vec2::new(
                    uniform(rng, 0.0, viewport.width),
                    uniform(rng, 0.0, viewport.height),
                ),
                size: STAR_SIZES.choose(rng).copied().unwrap_or(1.0),
                color: STAR_COLORS.choose(rng).copied().unwrap_or(Rgba::WHITE),
                speed: STAR_SPEEDS.choose(rng).copied().unwrap_or(20.0),
            })
            .collect();
        Self { stars }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Scroll down; stars leaving the bottom reappear at the top at a new x
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, viewport: &Viewport, rng: &mut R) {
        for star in &mut self.stars {
            star.pos.y += star.speed * dt;
            if star.pos.y > viewport.height {
                star.pos.y = 0.0;
                star.pos.x = uniform(rng, 0.0, viewport.width);
            }
        }
    }

    /// Star alpha for an opacity percentage (0-100)
    pub fn alpha_for_opacity(opacity: u8) -> u8 {
        (u32::from(opacity.min(100)) * 255 / 100) as u8
    }
}
