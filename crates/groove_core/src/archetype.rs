//! Archetype bank.
//!
//! Four static weight-table archetypes (Minimal, Groovy, Shimmery, Chaos)
//! form the corners of the 2-D pattern field. Each `(genre,
//! archetype)` pair owns its own anchor/shimmer tables plus a swing amount;
//! genre applies a small, fixed bias so the four corners read distinctly
//! per style family without changing their qualitative shape. Tables are
//! built once into a read-only bank; nothing here allocates at generation
//! time.

use crate::params::{Genre, MAX_PATTERN_LENGTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
    Minimal,
    Groovy,
    Shimmery,
    Chaos,
}

impl Archetype {
    /// Corner of the `(axisX, axisY)` unit square this archetype occupies.
    pub const fn corner(self) -> (u8, u8) {
        match self {
            Archetype::Minimal => (0, 0),
            Archetype::Groovy => (1, 0),
            Archetype::Shimmery => (0, 1),
            Archetype::Chaos => (1, 1),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ArchetypeTables {
    pub anchor: [f32; MAX_PATTERN_LENGTH],
    pub shimmer: [f32; MAX_PATTERN_LENGTH],
    pub swing_amount: f32,
}

fn genre_bias(genre: Genre) -> f32 {
    match genre {
        Genre::Techno => 0.0,
        Genre::Tribal => 0.04,
        Genre::Idm => -0.03,
    }
}

fn genre_swing(genre: Genre) -> f32 {
    match genre {
        Genre::Techno => 0.0,
        Genre::Tribal => 0.03,
        Genre::Idm => -0.02,
    }
}

fn minimal_anchor(bias: f32) -> [f32; MAX_PATTERN_LENGTH] {
    let mut w = [0.0f32; MAX_PATTERN_LENGTH];
    for (i, slot) in w.iter_mut().enumerate() {
        *slot = if i % 32 == 0 {
            1.0
        } else if i % 8 == 0 {
            (0.95 + bias).clamp(0.0, 1.0)
        } else if i % 4 == 0 {
            (0.2 + bias * 0.5).clamp(0.0, 1.0)
        } else {
            0.0
        };
    }
    w
}

fn minimal_shimmer(bias: f32) -> [f32; MAX_PATTERN_LENGTH] {
    let mut w = [0.0f32; MAX_PATTERN_LENGTH];
    for (i, slot) in w.iter_mut().enumerate() {
        *slot = if i % 8 == 4 {
            (0.2 + bias * 0.5).clamp(0.0, 1.0)
        } else if i % 4 == 2 {
            0.05
        } else {
            0.0
        };
    }
    w
}

fn groovy_anchor(bias: f32) -> [f32; MAX_PATTERN_LENGTH] {
    let mut w = [0.0f32; MAX_PATTERN_LENGTH];
    for (i, slot) in w.iter_mut().enumerate() {
        *slot = if i % 8 == 0 {
            1.0
        } else if i % 8 == 4 {
            (0.8 + bias).clamp(0.0, 1.0)
        } else if i % 4 == 2 {
            // ghost candidate: winnable under low Gumbel temperature
            (0.55 + bias * 0.5).clamp(0.0, 1.0)
        } else {
            0.15
        };
    }
    w
}

fn groovy_shimmer(bias: f32) -> [f32; MAX_PATTERN_LENGTH] {
    let mut w = [0.0f32; MAX_PATTERN_LENGTH];
    for (i, slot) in w.iter_mut().enumerate() {
        *slot = if i % 4 == 2 {
            (0.6 + bias * 0.5).clamp(0.0, 1.0)
        } else if i % 8 == 6 {
            0.5
        } else {
            0.1
        };
    }
    w
}

fn shimmery_anchor(bias: f32) -> [f32; MAX_PATTERN_LENGTH] {
    let mut w = [0.0f32; MAX_PATTERN_LENGTH];
    for (i, slot) in w.iter_mut().enumerate() {
        *slot = if i % 16 == 0 {
            1.0
        } else if i % 8 == 0 {
            (0.7 + bias).clamp(0.0, 1.0)
        } else {
            0.1
        };
    }
    w
}

fn shimmery_shimmer(bias: f32) -> [f32; MAX_PATTERN_LENGTH] {
    let mut w = [0.0f32; MAX_PATTERN_LENGTH];
    for (i, slot) in w.iter_mut().enumerate() {
        *slot = if i % 2 == 1 {
            (0.75 + bias * 0.5).clamp(0.0, 1.0)
        } else if i % 4 == 0 {
            0.05
        } else {
            0.3
        };
    }
    w
}

fn chaos_anchor(bias: f32) -> [f32; MAX_PATTERN_LENGTH] {
    let mut w = [0.0f32; MAX_PATTERN_LENGTH];
    for (i, slot) in w.iter_mut().enumerate() {
        let r = i % 7;
        *slot = match r {
            0 => (0.9 + bias * 0.3).clamp(0.0, 0.9),
            1 => 0.0,
            2 => 0.45,
            3 => 0.0,
            4 => 0.6,
            5 => 0.0,
            _ => 0.25,
        };
    }
    w
}

fn chaos_shimmer(bias: f32) -> [f32; MAX_PATTERN_LENGTH] {
    let mut w = [0.0f32; MAX_PATTERN_LENGTH];
    for (i, slot) in w.iter_mut().enumerate() {
        let r = i % 5;
        *slot = match r {
            0 => 0.0,
            1 => (0.8 + bias * 0.3).clamp(0.0, 0.9),
            2 => 0.0,
            3 => 0.35,
            _ => 0.0,
        };
    }
    w
}

/// Build the weight/swing table for one `(genre, archetype)` pair.
pub fn tables_for(genre: Genre, archetype: Archetype) -> ArchetypeTables {
    let bias = genre_bias(genre);
    let swing_base: f32 = match archetype {
        Archetype::Minimal => 0.50,
        Archetype::Groovy => 0.62,
        Archetype::Shimmery => 0.58,
        Archetype::Chaos => 0.70,
    };
    let (anchor, shimmer) = match archetype {
        Archetype::Minimal => (minimal_anchor(bias), minimal_shimmer(bias)),
        Archetype::Groovy => (groovy_anchor(bias), groovy_shimmer(bias)),
        Archetype::Shimmery => (shimmery_anchor(bias), shimmery_shimmer(bias)),
        Archetype::Chaos => (chaos_anchor(bias), chaos_shimmer(bias)),
    };
    ArchetypeTables {
        anchor,
        shimmer,
        swing_amount: (swing_base + genre_swing(genre)).clamp(0.5, 0.7),
    }
}
