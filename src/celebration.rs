use rand::seq::SliceRandom;
use rand::Rng;

const WORDS: [&str; 5] = ["FLAWLESS!", "SHARP EYE!", "PERFECT!", "SPOT ON!", "BULLSEYE!"];
const SPARKS: [char; 5] = ['*', '+', '·', '✦', '✧'];

/// Seconds of animation advanced per tick
const STEP_SECS: f64 = 0.1;
/// How long a celebration runs before clearing itself
const DURATION_TICKS: u32 = 30;

/// One glyph of the celebration, either a falling spark or a letter of the banner
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
    /// Banner letters glide to a fixed target and stay there
    pub target: Option<(f64, f64)>,
}

impl Particle {
    fn spark<R: Rng>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-3.0..3.0),
            vel_y: rng.gen_range(-4.0..-1.0),
            symbol: *SPARKS.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..6),
            age: 0.0,
            max_age: rng.gen_range(1.5..3.0),
            target: None,
        }
    }

    fn letter<R: Rng>(from: (f64, f64), to: (f64, f64), symbol: char, rng: &mut R) -> Self {
        Self {
            x: from.0,
            y: from.1,
            vel_x: to.0 - from.0,
            vel_y: to.1 - from.1,
            symbol,
            color_index: rng.gen_range(0..6),
            age: 0.0,
            max_age: f64::INFINITY,
            target: Some(to),
        }
    }

    fn update(&mut self, dt: f64) -> bool {
        match self.target {
            Some((tx, ty)) => {
                let remaining = ((tx - self.x).powi(2) + (ty - self.y).powi(2)).sqrt();
                if remaining > 0.5 {
                    self.x += self.vel_x * dt * 2.0;
                    self.y += self.vel_y * dt * 2.0;
                    self.vel_x = tx - self.x;
                    self.vel_y = ty - self.y;
                } else {
                    self.x = tx;
                    self.y = ty;
                }
            }
            None => {
                self.x += self.vel_x * dt;
                self.y += self.vel_y * dt;
                self.vel_y += 12.0 * dt;
            }
        }
        self.age += dt;
        self.age < self.max_age
    }
}

/// Particle burst shown over the results screen after a round with no misses
#[derive(Debug, Default)]
pub struct Celebration {
    pub particles: Vec<Particle>,
    pub word: &'static str,
    ticks_left: u32,
    width: f64,
    height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.ticks_left > 0
    }

    pub fn start(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();
        self.particles.clear();
        self.width = width as f64;
        self.height = height as f64;
        self.ticks_left = DURATION_TICKS;
        self.word = WORDS.choose(&mut rng).copied().unwrap_or(WORDS[0]);

        let center = (self.width / 2.0, self.height / 2.0);
        let start_x = center.0 - (self.word.chars().count() as f64 - 1.0);
        for (i, ch) in self.word.chars().enumerate().filter(|(_, c)| *c != ' ') {
            let from = (
                center.0 + rng.gen_range(-10.0..10.0),
                center.1 + rng.gen_range(-5.0..5.0),
            );
            let to = (start_x + i as f64 * 2.0, center.1 - 2.0);
            self.particles.push(Particle::letter(from, to, ch, &mut rng));
        }
        for _ in 0..20 {
            let x = center.0 + rng.gen_range(-15.0..15.0);
            let y = center.1 + rng.gen_range(-6.0..6.0);
            self.particles.push(Particle::spark(x, y, &mut rng));
        }
    }

    pub fn stop(&mut self) {
        self.ticks_left = 0;
        self.particles.clear();
    }

    /// Advance one tick; sparks that fall off screen or burn out are dropped
    pub fn update(&mut self) {
        if !self.is_active() {
            return;
        }
        self.ticks_left -= 1;
        if self.ticks_left == 0 {
            self.particles.clear();
            return;
        }

        let (width, height) = (self.width, self.height);
        self.particles.retain_mut(|p| {
            let alive = p.update(STEP_SECS);
            let on_screen =
                p.target.is_some() || (p.y <= height + 2.0 && p.x >= -2.0 && p.x <= width + 2.0);
            alive && on_screen
        });
    }
}
