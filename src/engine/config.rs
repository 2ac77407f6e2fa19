// Energy economy
pub const INITIAL_ENERGY: i32 = 100;
pub const MOVE_BASE_COST: i32 = 10; // plus the creature's speed
pub const EAT_COST: i32 = 20;

// Number of nearest visible food items weighed per decision.
pub const CONTENTION_CANDIDATES: usize = 2;

// Spatial index bucket edge, in grid cells.
pub const SPATIAL_CELL_SIZE: i32 = 8;

// Tick duration (microseconds) above which the arena logs a warning.
pub const TICK_BUDGET_US: u64 = 50_000;

// Upper bounds accepted from configuration.
pub const MAX_GRID_SIDE: i32 = 100_000;
pub const MAX_SPEED: i32 = 1_000_000;

// Founder traits used when nothing else is configured.
pub const DEFAULT_SPEED: i32 = 3;
pub const DEFAULT_SIZE: i32 = 3;
pub const DEFAULT_SENSE: i32 = 10;
pub const DEFAULT_INTELLIGENCE: f64 = 1.0;
