/// Magic/tragic value meaning the outcome is already decided in the team's favor
/// (clinched, or already safe).
pub const CLINCHED: u32 = 0;

/// Magic/tragic value meaning the outcome is mathematically impossible.
pub const IMPOSSIBLE: u32 = 999;

/// Regular-season length in a ten-team league
pub const DEFAULT_TOTAL_GAMES: u32 = 144;

/// Games each team plays against every other team
pub const DEFAULT_GAMES_PER_OPPONENT: u32 = 16;

/// Number of teams that qualify for the postseason
pub const DEFAULT_PLAYOFF_SPOTS: u32 = 5;

/// Average win total of the first-place team over recent 144-game seasons
pub const DEFAULT_HISTORICAL_AVERAGE_WINS: u32 = 87;

/// Fixed win total used as a simple playoff qualification bar
pub const DEFAULT_LEGACY_PLAYOFF_BASELINE: u32 = 72;

/// Decimal places used to group scenario win percentages into matrix rows
pub const DEFAULT_SCENARIO_PRECISION: u32 = 3;

/// Upper bound on the scenario precision setting
pub const MAX_SCENARIO_PRECISION: u32 = 6;

/// Season replays per Monte Carlo simulation unless the caller asks otherwise
pub const DEFAULT_SIMULATION_RUNS: usize = 10_000;

/// Win probability against an average (.500) opponent, and the fallback when
/// a matchup probability is undefined
pub const NEUTRAL_WIN_PROB: f64 = 0.5;
