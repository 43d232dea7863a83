use crate::particles::FieldStyle;
use crate::shade::Rgb;
use clap::Parser;

/// Animated particle field with drifting isometric solids
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Number of particles in the field
    #[arg(long, default_value_t = 100)]
    pub particles: usize,

    /// Number of isometric objects
    #[arg(long, default_value_t = 22)]
    pub objects: usize,

    /// Color theme used for the background
    #[arg(long, default_value = "dark")]
    pub theme: String,

    /// Background color (#rrggbb) overriding the theme
    #[arg(long)]
    pub background: Option<Rgb>,

    /// Particle palette, speed and pointer behavior
    #[arg(long, value_enum, default_value_t = FieldStyle::Electro)]
    pub style: FieldStyle,

    /// Seed for a reproducible animation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Initial window width
    #[arg(long, default_value_t = 960.0)]
    pub width: f64,

    /// Initial window height
    #[arg(long, default_value_t = 640.0)]
    pub height: f64,

    /// Start with the debug overlay visible
    #[arg(long)]
    pub debug: bool,
}

/// Construction-time parameters of a scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub particles: usize,
    pub objects: usize,
    pub style: FieldStyle,
    pub theme: String,
    pub background: Option<Rgb>,
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            particles: 100,
            objects: 22,
            style: FieldStyle::Electro,
            theme: "dark".to_string(),
            background: None,
            seed: None,
        }
    }
}

impl Args {
    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            particles: self.particles,
            objects: self.objects,
            style: self.style,
            theme: self.theme.clone(),
            background: self.background,
            seed: self.seed,
        }
    }
}
