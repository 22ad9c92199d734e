use crossterm::style::Color;
use rand::Rng;

const CONFETTI_CHARS: &[char] = &['*', 'o', '+', '.', '•', '▪'];

/// A falling confetti particle in unit space (0..1 on both axes); the
/// renderer scales to the terminal.
pub struct Particle {
    pub x: f32,
    pub y: f32,
    vy: f32,
    drift: f32,
    pub ch: char,
    pub color: Color,
}

/// Win banner confetti. Spawns a few particles per frame and lets them fall.
pub struct WinScreen {
    pub particles: Vec<Particle>,
    pub frame: u32,
}

impl WinScreen {
    const MAX_PARTICLES: usize = 120;

    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            frame: 0,
        }
    }

    pub fn reset(&mut self) {
        self.particles.clear();
        self.frame = 0;
    }

    pub fn update(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        let mut rng = rand::thread_rng();

        if self.particles.len() < Self::MAX_PARTICLES {
            for _ in 0..3 {
                self.particles.push(Particle {
                    x: rng.gen_range(0.0..1.0),
                    y: 0.0,
                    vy: rng.gen_range(0.005..0.02),
                    drift: rng.gen_range(-0.003..0.003),
                    ch: CONFETTI_CHARS[rng.gen_range(0..CONFETTI_CHARS.len())],
                    color: random_bright_color(&mut rng),
                });
            }
        }

        for p in &mut self.particles {
            p.y += p.vy;
            p.x += p.drift;
        }
        self.particles.retain(|p| p.y < 1.0 && (0.0..1.0).contains(&p.x));
    }
}

fn random_bright_color(rng: &mut impl Rng) -> Color {
    let palette = [
        Color::Rgb { r: 255, g: 120, b: 120 },
        Color::Rgb { r: 120, g: 255, b: 140 },
        Color::Rgb { r: 130, g: 170, b: 255 },
        Color::Rgb { r: 255, g: 220, b: 110 },
        Color::Rgb { r: 230, g: 140, b: 255 },
        Color::Rgb { r: 130, g: 240, b: 240 },
    ];
    palette[rng.gen_range(0..palette.len())]
}
