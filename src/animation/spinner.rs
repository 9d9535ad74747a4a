/// Braille dot spinner frames shown next to a connecting profile
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Get the current spinner frame character based on the tick count
pub fn spinner_frame(tick_count: u64) -> char {
    let idx = (tick_count / 2) as usize % SPINNER_FRAMES.len();
    SPINNER_FRAMES[idx]
}
