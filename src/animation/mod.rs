pub mod spinner;

/// Tick-driven animation state for the whole application
#[derive(Debug, Default)]
pub struct AnimationState {
    /// Monotonically increasing tick counter
    pub tick_count: u64,
}

impl AnimationState {
    /// Advance all animations by one tick
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
    }
}
