use glam::Vec3;

// Shared tree layout and motion tuning constants used by the web and native frontends.

// Tree volume
pub const TREE_HEIGHT: f32 = 12.0; // world units from base to apex
pub const TREE_BASE_Y: f32 = -6.0; // world-space height of the tree base
pub const TREE_BASE_RADIUS: f32 = 4.8; // cone radius at the base
pub const HEIGHT_BIAS_EXPONENT: f32 = 2.2; // pow(u, k) with k > 1 packs elements toward the base
pub const SPIRAL_WIND: f32 = 1.6; // radians of spiral per world unit of height
pub const SPIRAL_JITTER: f32 = 0.9; // max random angle added to the spiral (radians)

// Chaos shell
pub const CHAOS_SHELL_MIN: f32 = 14.0; // inner radius of the scatter shell
pub const CHAOS_SHELL_MAX: f32 = 22.0; // outer radius of the scatter shell

// Default group sizes
pub const DEFAULT_FOLIAGE_COUNT: usize = 4000;
pub const DEFAULT_ORNAMENT_COUNT: usize = 300;
pub const DEFAULT_PHOTO_COUNT: usize = 12;
pub const DEFAULT_SEED: u64 = 2024;

// Ornament split weights (ball / gift / light)
pub const ORNAMENT_BALL_WEIGHT: f32 = 0.8;
pub const ORNAMENT_GIFT_WEIGHT: f32 = 0.1;
pub const ORNAMENT_LIGHT_WEIGHT: f32 = 0.1;

// Per-instance speed multiplier range (1/s)
pub const SPEED_MIN: f32 = 0.6;
pub const SPEED_MAX: f32 = 2.4;

// Secondary motion
pub const WOBBLE_ENGAGE_DISTANCE: f32 = 0.5; // only wobble once this close to the formed position
pub const WOBBLE_FREQUENCY: f32 = 2.0; // rad/s
pub const WOBBLE_AMPLITUDE: f32 = 0.15; // world units per second of nudge
pub const PULSE_FREQUENCY: f32 = 3.0; // rad/s
pub const PULSE_AMPLITUDE: f32 = 0.25; // fraction of base scale
pub const GIFT_SPIN: Vec3 = Vec3::new(0.4, 0.7, 0.0); // rad/s per axis
pub const STAR_SPIN: Vec3 = Vec3::new(0.0, 0.9, 0.0); // rad/s per axis
pub const AXIS_EPSILON: f32 = 1e-4; // horizontal distance below which outward facing is undefined

// Palette for non-emissive elements (linear RGB)
pub const ORNAMENT_PALETTE: [[f32; 3]; 5] = [
    [0.80, 0.08, 0.10], // crimson
    [0.95, 0.72, 0.20], // gold
    [0.10, 0.45, 0.25], // pine
    [0.75, 0.78, 0.82], // silver
    [0.20, 0.25, 0.70], // midnight
];
pub const FOLIAGE_PALETTE: [[f32; 3]; 3] = [
    [0.05, 0.35, 0.15],
    [0.08, 0.45, 0.20],
    [0.12, 0.55, 0.28],
];
pub const LIGHT_COLOR: [f32; 3] = [1.0, 0.85, 0.55]; // warm emissive
pub const STAR_COLOR: [f32; 3] = [1.0, 0.9, 0.4]; // emissive gold
pub const PHOTO_COLOR: [f32; 3] = [1.0, 1.0, 1.0]; // card frames stay white

// Camera orbit
pub const ORBIT_AZIMUTH_RANGE: f32 = std::f32::consts::PI * 1.5; // radians of swing across the frame
pub const ORBIT_Y_OFFSET: f32 = 0.2; // hand y re-bias before sensitivity
pub const ORBIT_Y_SENSITIVITY: f32 = 1.6;
pub const ORBIT_MIN_POLAR: f32 = std::f32::consts::PI * 0.25; // keeps the camera off the pole
pub const ORBIT_MAX_POLAR: f32 = std::f32::consts::PI * 0.55; // just under the horizon
pub const ORBIT_RADIUS: f32 = 28.0;
pub const ORBIT_MIN_DISTANCE: f32 = 16.0;
pub const ORBIT_MAX_DISTANCE: f32 = 45.0;
pub const ORBIT_LOOK_AT_HEIGHT: f32 = -1.0; // visual centre of the tree, not the origin
pub const ORBIT_DAMPING_PER_SEC: f32 = 3.5; // exponential approach rate of the angles

// Lens
pub const CAMERA_FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 200.0; // well past the far side of the chaos shell
